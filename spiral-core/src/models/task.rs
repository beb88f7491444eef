use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::milestone::{optional, optional_text};
use super::values::{Priority, TaskStatus};
use crate::error::{Error, Result};
use crate::id::ItemId;

/// A unit of work under a milestone (a task) or under a task (a subtask).
///
/// Tasks and subtasks share one collection in the roadmap; which one an entry
/// is follows from the level of its `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub parent_id: String,
    pub title: String,
    /// One of the [`TaskStatus`] names, or empty.
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Task {
    pub fn item_id(&self) -> Result<ItemId> {
        self.id.parse()
    }

    pub fn parent_item_id(&self) -> Result<ItemId> {
        self.parent_id.parse()
    }

    /// The typed status, or `None` when empty or unrecognised.
    pub fn task_status(&self) -> Option<TaskStatus> {
        self.status.parse().ok()
    }
}

/// Input for adding a task or subtask.
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    /// Explicit id. Generated under `parent_id` when `None`.
    pub id: Option<String>,
    /// Milestone id for a task, task id for a subtask.
    pub parent_id: String,
    pub title: String,
    /// Defaults to `Planned`.
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

/// Partial edit of a task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Option<Priority>>,
    pub notes: Option<Option<String>>,
}

impl UpdateTaskInput {
    pub const FIELDS: [&'static str; 4] = ["title", "status", "priority", "notes"];

    /// Apply a textual `field=value` edit.
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "title" => self.title = Some(value.to_string()),
            "status" => self.status = Some(value.parse()?),
            "priority" => self.priority = Some(optional(value)?),
            "notes" => self.notes = Some(optional_text(value)),
            _ => return Err(Error::UnknownField(field.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(status) = self.status {
            task.status = status.as_str().to_string();
        }
        if let Some(priority) = self.priority {
            task.priority = priority.map(|p| p.as_str().to_string());
        }
        if let Some(notes) = self.notes {
            task.notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_required_on_set() {
        let mut update = UpdateTaskInput::default();
        assert!(matches!(
            update.set("status", ""),
            Err(Error::InvalidValue { field: "status", .. })
        ));
        update.set("status", "blocked").unwrap();
        assert_eq!(update.status, Some(TaskStatus::Blocked));
    }

    #[test]
    fn test_unknown_field() {
        let mut update = UpdateTaskInput::default();
        assert!(matches!(update.set("parent_id", "D2"), Err(Error::UnknownField(_))));
    }

    #[test]
    fn test_apply_only_touches_given_fields() {
        let mut task = Task {
            id: "D1.1".to_string(),
            parent_id: "D1".to_string(),
            title: "Write parser".to_string(),
            status: "planned".to_string(),
            priority: Some("high".to_string()),
            notes: None,
            metadata: BTreeMap::new(),
        };
        let mut update = UpdateTaskInput::default();
        update.set("status", "done").unwrap();
        update.apply(&mut task);

        assert_eq!(task.task_status(), Some(TaskStatus::Done));
        assert_eq!(task.priority.as_deref(), Some("high"));
        assert_eq!(task.title, "Write parser");
    }
}
