//! Next-id allocation against a roadmap snapshot.
//!
//! Numbering is scoped per family (milestones) or per parent (tasks and
//! subtasks) and is always the largest existing sibling number plus one.
//! Gaps left by removed items are never filled.

use crate::error::{Error, Result};
use crate::id::{ItemId, Level};
use crate::models::Roadmap;

/// Computes unused ids for a borrowed roadmap.
pub struct IdGenerator<'a> {
    roadmap: &'a Roadmap,
}

impl<'a> IdGenerator<'a> {
    pub fn new(roadmap: &'a Roadmap) -> Self {
        Self { roadmap }
    }

    /// `family` followed by one more than the highest milestone number in
    /// that family, or `family1` when there is none.
    ///
    /// Milestones whose id does not parse are skipped.
    pub fn next_milestone_id(&self, family: char) -> Result<ItemId> {
        let max = self
            .roadmap
            .milestones
            .iter()
            .filter_map(|m| lenient_parse(&m.id))
            .filter(|id| id.family() == family && id.level() == Level::Milestone)
            .map(|id| id.milestone_number())
            .max()
            .unwrap_or(0);

        let next = max.checked_add(1).ok_or_else(|| Error::Exhausted {
            scope: format!("family {family}"),
        })?;
        ItemId::milestone(family, next)
    }

    /// Next task id under a milestone.
    ///
    /// Fails with `InvalidParent` unless `parent_id` parses as a milestone id.
    pub fn next_task_id(&self, parent_id: &str) -> Result<ItemId> {
        let parent = expect_parent(parent_id, Level::Milestone)?;
        self.next_child(parent_id, parent)
    }

    /// Next subtask id under a task.
    ///
    /// Fails with `InvalidParent` unless `parent_id` parses as a task id.
    pub fn next_subtask_id(&self, parent_id: &str) -> Result<ItemId> {
        let parent = expect_parent(parent_id, Level::Task)?;
        self.next_child(parent_id, parent)
    }

    /// Milestone id when `parent_id` is `None`, otherwise the next child id
    /// one level below the parent.
    pub fn suggest_id(&self, family: char, parent_id: Option<&str>) -> Result<ItemId> {
        let Some(parent_id) = parent_id else {
            return self.next_milestone_id(family);
        };
        let parent = ItemId::parse(parent_id)
            .map_err(|e| Error::invalid_parent(parent_id, e.to_string()))?;
        match parent.level() {
            Level::Milestone => self.next_task_id(parent_id),
            Level::Task => self.next_subtask_id(parent_id),
            Level::Subtask => Err(Error::invalid_parent(
                parent_id,
                "cannot create a child of a subtask",
            )),
        }
    }

    /// Fails with `DuplicateId` when the id is already taken in the
    /// collection its level implies (milestones or tasks).
    pub fn validate_unique(&self, candidate: &str) -> Result<()> {
        let id = ItemId::parse(candidate)?;
        match id.level() {
            Level::Milestone if self.roadmap.milestone(candidate).is_some() => {
                Err(Error::DuplicateId {
                    kind: "milestone",
                    id: candidate.to_string(),
                })
            }
            Level::Task | Level::Subtask if self.roadmap.task(candidate).is_some() => {
                Err(Error::DuplicateId {
                    kind: "task",
                    id: candidate.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn next_child(&self, parent_text: &str, parent: ItemId) -> Result<ItemId> {
        let max = self
            .roadmap
            .tasks_by_parent(parent_text)
            .filter_map(|t| lenient_parse(&t.id))
            .filter(|id| id.parent() == Some(parent))
            .filter_map(|id| match parent.level() {
                Level::Milestone => id.task_number(),
                _ => id.subtask_number(),
            })
            .max()
            .unwrap_or(0);

        let next = max.checked_add(1).ok_or_else(|| Error::Exhausted {
            scope: parent_text.to_string(),
        })?;
        parent
            .child(next)
            .ok_or_else(|| Error::invalid_parent(parent_text, "cannot create a child of a subtask"))
    }
}

fn expect_parent(parent_id: &str, level: Level) -> Result<ItemId> {
    let parent = ItemId::parse(parent_id)
        .map_err(|e| Error::invalid_parent(parent_id, e.to_string()))?;
    if parent.level() != level {
        return Err(Error::invalid_parent(
            parent_id,
            format!("expected {level} id, got {} id", parent.level()),
        ));
    }
    Ok(parent)
}

fn lenient_parse(text: &str) -> Option<ItemId> {
    match ItemId::parse(text) {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!("Skipping malformed id while allocating: {}", e);
            None
        }
    }
}
