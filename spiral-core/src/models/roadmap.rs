use serde::{Deserialize, Serialize};

use super::milestone::Milestone;
use super::task::Task;

/// The whole roadmap: milestones plus one shared list of tasks and subtasks.
///
/// Order of both lists is the order of the persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Roadmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty() && self.tasks.is_empty()
    }

    pub fn milestone(&self, id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    pub fn milestone_mut(&mut self, id: &str) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|m| m.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// True if `id` names a milestone or a task.
    pub fn contains(&self, id: &str) -> bool {
        self.milestone(id).is_some() || self.task(id).is_some()
    }

    /// Tasks whose `parent_id` is exactly `parent_id`, in document order.
    pub fn tasks_by_parent<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| t.parent_id == parent_id)
    }
}
