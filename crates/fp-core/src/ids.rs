use core::fmt;

/// Compact numeric identifier as carried by protocol messages.
///
/// Each id kind is its own type so a timer id can never index the mode map.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a running mode, unique within one actuator's graph.
    ModeId
);
numeric_id!(
    /// Identifier of a timer, shared by every transition that references it.
    TimerId
);
numeric_id!(
    /// Identifier of an actuator, unique within its resource.
    ActuatorId
);

/// Identifier of a registered resource (device) as routed by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_round_trip_raw() {
        for raw in [0_u32, 1, 2, 42, 10_000] {
            assert_eq!(ModeId::new(raw).get(), raw);
            assert_eq!(TimerId::from(raw).get(), raw);
        }
    }

    #[test]
    fn debug_names_the_kind() {
        assert_eq!(format!("{:?}", ModeId(3)), "ModeId(3)");
        assert_eq!(format!("{}", TimerId(7)), "7");
    }

    #[test]
    fn resource_id_display() {
        let id = ResourceId::from("boiler-1");
        assert_eq!(id.to_string(), "boiler-1");
        assert_eq!(id.as_str(), "boiler-1");
    }
}
