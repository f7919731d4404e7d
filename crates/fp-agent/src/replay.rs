//! Scenario replay: feed every message through a registry, then answer the
//! scenario's queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use fp_control::ControlSpace;
use fp_core::{ModeId, ResourceId, scalar::as_watts};
use fp_efi::UpdateOutcome;
use tracing::{info, warn};

use crate::control::BufferConfig;
use crate::convert;
use crate::error::AgentResult;
use crate::registry::{DeviceRegistry, Dispatched};
use crate::schema::Scenario;

/// Tally of what replaying the message stream did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub registered: usize,
    pub descriptions: usize,
    pub updates_applied: usize,
    pub updates_ignored: usize,
    pub allocations: usize,
    pub deregistered: usize,
}

/// Answer to one scenario query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub resource_id: ResourceId,
    pub at: DateTime<Utc>,
    pub reachable: Vec<ModeId>,
    pub demands_w: Vec<f64>,
    pub control_space: Option<ControlSpace>,
}

#[derive(Debug)]
pub struct ReplayReport {
    pub summary: ReplaySummary,
    pub answers: Vec<QueryAnswer>,
    /// Registry state after the last message, for further inspection.
    pub registry: DeviceRegistry,
}

/// Replay `scenario` against a fresh registry.
///
/// The first failing message aborts the replay.
pub fn replay(scenario: &Scenario) -> AgentResult<ReplayReport> {
    let registry = DeviceRegistry::new();
    let mut summary = ReplaySummary::default();

    let messages = convert::registrations(scenario).into_iter().map(Ok).chain(
        scenario
            .messages
            .iter()
            .map(|m| convert::message(scenario, m)),
    );
    for message in messages {
        match registry.dispatch(message?)? {
            Dispatched::Registered => summary.registered += 1,
            Dispatched::Deregistered => summary.deregistered += 1,
            Dispatched::DescriptionInstalled => summary.descriptions += 1,
            Dispatched::StateUpdate(UpdateOutcome::Applied) => summary.updates_applied += 1,
            Dispatched::StateUpdate(UpdateOutcome::Ignored) => summary.updates_ignored += 1,
            Dispatched::AllocationRecorded => summary.allocations += 1,
        }
    }
    info!(scenario = %scenario.name, ?summary, "replayed message stream");

    let configs = scenario
        .devices
        .iter()
        .filter_map(|d| d.buffer.as_ref().map(|b| (d.id.as_str(), b)))
        .map(|(id, b)| -> AgentResult<_> { Ok((id, convert::buffer_config(b)?)) })
        .collect::<AgentResult<BTreeMap<&str, BufferConfig>>>()?;

    let mut answers = Vec::with_capacity(scenario.queries.len());
    for query in &scenario.queries {
        let resource_id = ResourceId::new(query.resource_id.clone());
        let device = registry.device(&resource_id)?;
        let reachable = device.reachable_mode_ids(query.at).into_iter().collect();
        let demands_w = device
            .possible_demands(query.at, query.fill_level)?
            .into_iter()
            .map(as_watts)
            .collect();
        let control_space = match (query.control_space, configs.get(query.resource_id.as_str())) {
            (false, _) => None,
            (true, Some(config)) => Some(registry.control_space(&resource_id, config, query.at)?),
            (true, None) => {
                warn!(%resource_id, "control space requested without buffer parameters");
                None
            }
        };
        answers.push(QueryAnswer {
            resource_id,
            at: query.at,
            reachable,
            demands_w,
            control_space,
        });
    }

    Ok(ReplayReport {
        summary,
        answers,
        registry,
    })
}
