use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How urgent a milestone or task is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Whether a milestone is part of the active working period.
///
/// - `Planned`: Scheduled but not being worked on
/// - `InCycle`: Actively worked on in the current cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CycleStatus {
    Planned,
    InCycle,
}

impl CycleStatus {
    pub const ALL: [Self; 2] = [Self::Planned, Self::InCycle];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InCycle => "in-cycle",
        }
    }
}

/// Progress of a task or subtask.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Planned,
    InProgress,
    Done,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [Self; 4] = [Self::Planned, Self::InProgress, Self::Done, Self::Blocked];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Blocked => "blocked",
        }
    }
}

macro_rules! text_enum {
    ($ty:ty, $field:literal) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|value| value.as_str() == s)
                    .ok_or_else(|| Error::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(Priority, "priority");
text_enum!(CycleStatus, "cycle_status");
text_enum!(TaskStatus, "status");

/// True when `value` is empty or names a member of `T`.
pub(crate) fn is_member<T: FromStr>(value: &str) -> bool {
    value.is_empty() || value.parse::<T>().is_ok()
}
