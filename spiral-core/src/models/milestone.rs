use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::values::{CycleStatus, Priority};
use crate::error::{Error, Result};
use crate::id::ItemId;

/// Status given to milestones that do not record one.
pub const DEFAULT_MILESTONE_STATUS: &str = "planned";

/// A top-level roadmap goal such as `D3`.
///
/// Enum-valued fields are kept as text so that a hand-edited roadmap with an
/// unknown value still loads; [`crate::validate::validate`] rejects it before
/// the next save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    /// Product family letter. Equal to the first character of `id`.
    #[serde(default)]
    pub family: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_status: Option<String>,
    /// Free-form status text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Milestone {
    pub fn item_id(&self) -> Result<ItemId> {
        self.id.parse()
    }

    pub fn status(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => DEFAULT_MILESTONE_STATUS,
        }
    }

    pub fn is_in_cycle(&self) -> bool {
        self.cycle_status.as_deref() == Some(CycleStatus::InCycle.as_str())
    }
}

/// Input for adding a milestone.
#[derive(Debug, Clone, Default)]
pub struct CreateMilestoneInput {
    /// Explicit level-0 id. Generated from `family` when `None`.
    pub id: Option<String>,
    /// Family used for id generation. Ignored when `id` is given.
    pub family: Option<char>,
    pub title: String,
    pub priority: Option<Priority>,
    pub cycle_status: Option<CycleStatus>,
    pub notes: Option<String>,
}

/// Partial edit of a milestone. `None` leaves a field untouched.
///
/// For optional fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateMilestoneInput {
    pub title: Option<String>,
    pub priority: Option<Option<Priority>>,
    pub cycle_status: Option<Option<CycleStatus>>,
    pub status: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

impl UpdateMilestoneInput {
    pub const FIELDS: [&'static str; 5] = ["title", "priority", "cycle_status", "status", "notes"];

    /// Apply a textual `field=value` edit. An empty value clears optional fields.
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "title" => self.title = Some(value.to_string()),
            "priority" => self.priority = Some(optional(value)?),
            "cycle_status" | "cycle-status" => self.cycle_status = Some(optional(value)?),
            "status" => self.status = Some(optional_text(value)),
            "notes" => self.notes = Some(optional_text(value)),
            _ => return Err(Error::UnknownField(field.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, milestone: &mut Milestone) {
        if let Some(title) = self.title {
            milestone.title = title;
        }
        if let Some(priority) = self.priority {
            milestone.priority = priority.map(|p| p.as_str().to_string());
        }
        if let Some(cycle_status) = self.cycle_status {
            milestone.cycle_status = cycle_status.map(|c| c.as_str().to_string());
        }
        if let Some(status) = self.status {
            milestone.status = status;
        }
        if let Some(notes) = self.notes {
            milestone.notes = notes;
        }
    }
}

pub(crate) fn optional<T: std::str::FromStr<Err = Error>>(value: &str) -> Result<Option<T>> {
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

pub(crate) fn optional_text(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone() -> Milestone {
        Milestone {
            id: "D1".to_string(),
            family: "D".to_string(),
            title: "Onboarding".to_string(),
            priority: Some("low".to_string()),
            cycle_status: None,
            status: None,
            notes: Some("draft".to_string()),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_status_defaults_to_planned() {
        assert_eq!(milestone().status(), "planned");
    }

    #[test]
    fn test_update_set_and_apply() {
        let mut update = UpdateMilestoneInput::default();
        update.set("priority", "critical").unwrap();
        update.set("cycle-status", "in-cycle").unwrap();
        update.set("notes", "").unwrap();

        let mut m = milestone();
        update.apply(&mut m);

        assert_eq!(m.priority.as_deref(), Some("critical"));
        assert!(m.is_in_cycle());
        assert!(m.notes.is_none());
        assert_eq!(m.title, "Onboarding");
    }

    #[test]
    fn test_update_rejects_unknown_field() {
        let mut update = UpdateMilestoneInput::default();
        let err = update.set("family", "E").unwrap_err();
        assert!(matches!(err, Error::UnknownField(f) if f == "family"));
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_rejects_invalid_value() {
        let mut update = UpdateMilestoneInput::default();
        assert!(matches!(
            update.set("cycle_status", "someday"),
            Err(Error::InvalidValue { field: "cycle_status", .. })
        ));
    }
}
