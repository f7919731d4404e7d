use clap::{Parser, Subcommand};
use fp_agent::{AgentResult, QueryAnswer, Scenario, load_scenario, logging, replay};
use fp_control::ControlSpace;
use fp_core::scalar::as_kwh;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(about = "Running-mode reachability and demand projection for flexible devices", long_about = None)]
struct Cli {
    /// Log filter directive (overrides FP_LOG and the scenario's setting)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario syntax and structure
    Validate {
        /// Path to the scenario file (YAML, or JSON by extension)
        scenario_path: PathBuf,
    },
    /// Replay a scenario's messages and answer its queries
    Replay {
        /// Path to the scenario file (YAML, or JSON by extension)
        scenario_path: PathBuf,
    },
}

fn main() -> AgentResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path, cli.log.as_deref()),
        Commands::Replay { scenario_path } => cmd_replay(&scenario_path, cli.log.as_deref()),
    }
}

fn load(path: &Path, log: Option<&str>) -> AgentResult<Scenario> {
    let scenario = load_scenario(path)?;
    let filter = logging::resolve_filter(log, scenario.logging.as_ref().map(|l| l.filter.as_str()));
    logging::init_tracing(&filter);
    tracing::debug!(path = %path.display(), %filter, "loaded scenario");
    Ok(scenario)
}

fn cmd_validate(path: &Path, log: Option<&str>) -> AgentResult<()> {
    println!("Validating scenario: {}", path.display());
    let scenario = load(path, log)?;
    println!(
        "✓ Scenario '{}' is valid ({} devices, {} messages, {} queries)",
        scenario.name,
        scenario.devices.len(),
        scenario.messages.len(),
        scenario.queries.len()
    );
    Ok(())
}

fn cmd_replay(path: &Path, log: Option<&str>) -> AgentResult<()> {
    let scenario = load(path, log)?;
    println!("Replaying scenario: {}", scenario.name);

    let report = replay(&scenario)?;
    let s = &report.summary;
    println!(
        "✓ {} registered, {} descriptions, {} updates applied ({} ignored), {} allocations, {} deregistered",
        s.registered,
        s.descriptions,
        s.updates_applied,
        s.updates_ignored,
        s.allocations,
        s.deregistered
    );

    if report.answers.is_empty() {
        println!("No queries in scenario");
    }
    for answer in &report.answers {
        print_answer(answer);
    }
    Ok(())
}

fn print_answer(answer: &QueryAnswer) {
    let modes: Vec<String> = answer.reachable.iter().map(|m| m.to_string()).collect();
    let demands: Vec<String> = answer.demands_w.iter().map(|w| format!("{w:.1} W")).collect();
    println!("{} @ {}", answer.resource_id, answer.at.to_rfc3339());
    println!("  Reachable modes: [{}]", modes.join(", "));
    println!("  Possible demands: [{}]", demands.join(", "));

    if let Some(space) = &answer.control_space {
        let buffer = space.buffer();
        println!(
            "  Control space: {:.1} kWh, state of charge {:.3}",
            as_kwh(buffer.total_capacity()),
            buffer.state_of_charge()
        );
        if let ControlSpace::Storage(storage) = space {
            println!(
                "    efficiency: charge {:.2}, discharge {:.2}",
                storage.charge_efficiency(),
                storage.discharge_efficiency()
            );
        }
        if let Some(target) = buffer.target() {
            println!(
                "    target: {:.3} by {}",
                target.state_of_charge,
                target.time.to_rfc3339()
            );
        }
    }
}
