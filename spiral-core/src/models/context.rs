use serde::{Deserialize, Serialize};

use super::milestone::Milestone;
use super::roadmap::Roadmap;
use super::task::Task;
use crate::id::ItemId;

/// Family used when nothing else suggests one.
pub const DEFAULT_FAMILY: char = 'D';

/// Pointer to the milestone (and optionally task) the operator is focused on.
///
/// The pointer is not checked against the roadmap when written. A context
/// naming a deleted milestone is a legal state that [`Context::resolve`]
/// reports as [`ContextTarget::Stale`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// What a context points at, checked against a loaded roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTarget<'a> {
    Unset,
    Active {
        milestone: &'a Milestone,
        task: Option<&'a Task>,
    },
    /// The milestone or task id no longer exists in the roadmap.
    Stale { id: &'a str },
}

impl Context {
    /// Focus on a milestone, caching its family.
    pub fn for_milestone(milestone: &Milestone) -> Self {
        Self {
            milestone_id: Some(milestone.id.clone()),
            task_id: None,
            family: (!milestone.family.is_empty()).then(|| milestone.family.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.milestone_id.is_none() && self.task_id.is_none() && self.family.is_none()
    }

    /// The family to mint new milestone ids in.
    ///
    /// Uses the cached family, then the family of the milestone or task
    /// pointer, then `default`.
    pub fn family_hint(&self, default: char) -> char {
        let cached = self
            .family
            .as_deref()
            .and_then(|f| f.chars().next())
            .filter(char::is_ascii_alphabetic);
        let from_id = |id: &Option<String>| {
            id.as_deref()
                .and_then(|id| ItemId::parse(id).ok())
                .map(|id| id.family())
        };
        cached
            .or_else(|| from_id(&self.milestone_id))
            .or_else(|| from_id(&self.task_id))
            .unwrap_or(default)
    }

    /// The id new work should be attached to: the task if set, else the milestone.
    pub fn focus_id(&self) -> Option<&str> {
        self.task_id.as_deref().or(self.milestone_id.as_deref())
    }

    pub fn resolve<'a>(&'a self, roadmap: &'a Roadmap) -> ContextTarget<'a> {
        let Some(milestone_id) = self.milestone_id.as_deref() else {
            return ContextTarget::Unset;
        };
        let Some(milestone) = roadmap.milestone(milestone_id) else {
            return ContextTarget::Stale { id: milestone_id };
        };
        let task = match self.task_id.as_deref() {
            Some(task_id) => match roadmap.task(task_id) {
                Some(task) => Some(task),
                None => return ContextTarget::Stale { id: task_id },
            },
            None => None,
        };
        ContextTarget::Active { milestone, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roadmap() -> Roadmap {
        serde_yaml::from_str(
            "milestones:\n  - {id: E2, family: E, title: Search}\ntasks:\n  - {id: E2.1, parent_id: E2, title: Index, status: planned}\n",
        )
        .unwrap()
    }

    #[test]
    fn test_family_hint_precedence() {
        let mut context = Context::default();
        assert_eq!(context.family_hint('D'), 'D');

        context.task_id = Some("F1.2".to_string());
        assert_eq!(context.family_hint('D'), 'F');

        context.milestone_id = Some("E2".to_string());
        assert_eq!(context.family_hint('D'), 'E');

        context.family = Some("G".to_string());
        assert_eq!(context.family_hint('D'), 'G');
    }

    #[test]
    fn test_resolve_states() {
        let roadmap = roadmap();
        assert_eq!(Context::default().resolve(&roadmap), ContextTarget::Unset);

        let active = Context::for_milestone(&roadmap.milestones[0]);
        assert!(matches!(active.resolve(&roadmap), ContextTarget::Active { task: None, .. }));

        let stale = Context {
            milestone_id: Some("E9".to_string()),
            ..Context::default()
        };
        assert_eq!(stale.resolve(&roadmap), ContextTarget::Stale { id: "E9" });

        let stale_task = Context {
            milestone_id: Some("E2".to_string()),
            task_id: Some("E2.7".to_string()),
            family: None,
        };
        assert_eq!(stale_task.resolve(&roadmap), ContextTarget::Stale { id: "E2.7" });
    }

    #[test]
    fn test_serialized_context_omits_unset_fields() {
        let context = Context {
            milestone_id: Some("D3".to_string()),
            ..Context::default()
        };
        assert_eq!(serde_json::to_string(&context).unwrap(), r#"{"milestone_id":"D3"}"#);
    }
}
