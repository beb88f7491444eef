//! Mutating operations on an in-memory roadmap.
//!
//! Each operation checks its preconditions before touching the roadmap, so a
//! failed call leaves it unchanged.

use std::collections::{BTreeMap, HashSet};

use crate::error::{Error, Result, ValidationError};
use crate::generator::IdGenerator;
use crate::id::{ItemId, Level};
use crate::models::*;

impl Roadmap {
    /// Add a milestone, generating its id when none is given.
    pub fn add_milestone(&mut self, input: CreateMilestoneInput) -> Result<&Milestone> {
        let generator = IdGenerator::new(self);
        let id = match input.id.as_deref() {
            Some(text) => {
                let id = ItemId::parse(text)?;
                if id.level() != Level::Milestone {
                    return Err(Error::UnexpectedLevel {
                        id: text.to_string(),
                        expected: Level::Milestone,
                        found: id.level(),
                    });
                }
                id
            }
            None => generator.next_milestone_id(input.family.unwrap_or(DEFAULT_FAMILY))?,
        };
        let id_text = id.to_string();
        generator.validate_unique(&id_text)?;

        if input.title.is_empty() {
            return Err(ValidationError::EmptyMilestoneTitle { id: id_text }.into());
        }

        tracing::debug!("Adding milestone {}", id_text);
        self.milestones.push(Milestone {
            id: id_text,
            family: id.family().to_string(),
            title: input.title,
            priority: input.priority.map(|p| p.as_str().to_string()),
            cycle_status: input.cycle_status.map(|c| c.as_str().to_string()),
            status: Some(DEFAULT_MILESTONE_STATUS.to_string()),
            notes: input.notes.filter(|n| !n.is_empty()),
            metadata: BTreeMap::new(),
        });
        Ok(&self.milestones[self.milestones.len() - 1])
    }

    /// Add a task under a milestone or a subtask under a task.
    ///
    /// The parent must exist. An explicit id must be unique and must sit
    /// directly below the parent (`D3.4` under `D3`).
    pub fn add_task(&mut self, input: CreateTaskInput) -> Result<&Task> {
        let parent_id = input.parent_id.as_str();
        let parent_level = if self.milestone(parent_id).is_some() {
            Level::Milestone
        } else if self.task(parent_id).is_some() {
            ItemId::parse(parent_id)
                .map_err(|e| Error::invalid_parent(parent_id, e.to_string()))?
                .level()
        } else {
            return Err(Error::invalid_parent(parent_id, "parent does not exist"));
        };

        let generator = IdGenerator::new(self);
        let id = match input.id.as_deref() {
            Some(text) => {
                generator.validate_unique(text)?;
                let id = ItemId::parse(text)?;
                let expected = id.parent().map(|p| p.to_string());
                if expected.as_deref() != Some(parent_id) {
                    return Err(Error::invalid_parent(
                        parent_id,
                        format!(
                            "id {text} belongs under {}",
                            expected.as_deref().unwrap_or("no parent")
                        ),
                    ));
                }
                id
            }
            None => match parent_level {
                Level::Milestone => generator.next_task_id(parent_id)?,
                Level::Task => generator.next_subtask_id(parent_id)?,
                Level::Subtask => {
                    return Err(Error::invalid_parent(
                        parent_id,
                        "cannot create a child of a subtask",
                    ))
                }
            },
        };

        if input.title.is_empty() {
            return Err(ValidationError::EmptyTaskTitle { id: id.to_string() }.into());
        }

        tracing::debug!("Adding {} {} under {}", id.level(), id, parent_id);
        self.tasks.push(Task {
            id: id.to_string(),
            parent_id: input.parent_id,
            title: input.title,
            status: input.status.unwrap_or(TaskStatus::Planned).as_str().to_string(),
            priority: input.priority.map(|p| p.as_str().to_string()),
            notes: input.notes.filter(|n| !n.is_empty()),
            metadata: BTreeMap::new(),
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn update_milestone(&mut self, id: &str, input: UpdateMilestoneInput) -> Result<&Milestone> {
        if input.title.as_deref() == Some("") {
            return Err(ValidationError::EmptyMilestoneTitle { id: id.to_string() }.into());
        }
        let milestone = self.milestone_mut(id).ok_or_else(|| Error::NotFound {
            kind: "milestone",
            id: id.to_string(),
        })?;
        input.apply(milestone);
        Ok(milestone)
    }

    pub fn update_task(&mut self, id: &str, input: UpdateTaskInput) -> Result<&Task> {
        if input.title.as_deref() == Some("") {
            return Err(ValidationError::EmptyTaskTitle { id: id.to_string() }.into());
        }
        let task = self.task_mut(id).ok_or_else(|| Error::NotFound {
            kind: "task",
            id: id.to_string(),
        })?;
        input.apply(task);
        Ok(task)
    }

    /// Remove a milestone and every task beneath it. Returns the removed ids,
    /// milestone first.
    pub fn remove_milestone(&mut self, id: &str) -> Result<Vec<String>> {
        let index = self
            .milestones
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| Error::NotFound {
                kind: "milestone",
                id: id.to_string(),
            })?;
        self.milestones.remove(index);

        let mut removed = vec![id.to_string()];
        removed.extend(self.remove_descendants(id));
        Ok(removed)
    }

    /// Remove a task and its subtasks. Returns the removed ids, task first.
    pub fn remove_task(&mut self, id: &str) -> Result<Vec<String>> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound {
                kind: "task",
                id: id.to_string(),
            })?;
        self.tasks.remove(index);

        let mut removed = vec![id.to_string()];
        removed.extend(self.remove_descendants(id));
        Ok(removed)
    }

    fn remove_descendants(&mut self, root: &str) -> Vec<String> {
        let mut doomed: HashSet<String> = HashSet::from([root.to_string()]);
        loop {
            let before = doomed.len();
            for task in &self.tasks {
                if doomed.contains(&task.parent_id) {
                    doomed.insert(task.id.clone());
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        let mut removed = Vec::new();
        self.tasks.retain(|task| {
            if doomed.contains(&task.id) {
                removed.push(task.id.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}
