use crate::constants::{SCHEDULED_TASKS, SERVICES, UWP_APPS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of removable system component a rule or action targets.
///
/// Serialized in the singular form used by action plans (`service`, `uwp_app`,
/// `scheduled_task`); the plural knowledge base keys are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    #[serde(alias = "services")]
    Service,
    #[serde(alias = "uwp_apps")]
    UwpApp,
    #[serde(alias = "scheduled_tasks")]
    ScheduledTask,
}

impl ComponentKind {
    pub const ALL: [Self; 3] = [Self::Service, Self::UwpApp, Self::ScheduledTask];

    /// The plural key used by the rule set sections of the knowledge base.
    #[must_use]
    pub const fn section_key(self) -> &'static str {
        match self {
            Self::Service => SERVICES,
            Self::UwpApp => UWP_APPS,
            Self::ScheduledTask => SCHEDULED_TASKS,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::UwpApp => "uwp_app",
            Self::ScheduledTask => "scheduled_task",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a component kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownComponentKind(pub String);

impl fmt::Display for UnknownComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown component kind '{}' (expected service, uwp_app or scheduled_task)", self.0)
    }
}

impl std::error::Error for UnknownComponentKind {}

impl FromStr for ComponentKind {
    type Err = UnknownComponentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| normalized == kind.as_str() || normalized == kind.section_key())
            .ok_or_else(|| UnknownComponentKind(s.to_owned()))
    }
}
