//! Roadmap invariant checks run before every save.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::id::ItemId;
use crate::models::{is_member, CycleStatus, Priority, Roadmap, TaskStatus};

/// Check the roadmap invariants and return the first violation.
///
/// Checks run in four passes, each over milestones then tasks: empty ids,
/// titles and parents; duplicate ids; parent existence; enum membership.
/// A roadmap with both an empty title and a duplicate id therefore reports
/// the empty title.
pub fn validate(roadmap: &Roadmap) -> Result<(), ValidationError> {
    check_required_fields(roadmap)?;
    check_unique_ids(roadmap)?;
    check_parents(roadmap)?;
    check_enum_values(roadmap)
}

fn check_required_fields(roadmap: &Roadmap) -> Result<(), ValidationError> {
    for (index, milestone) in roadmap.milestones.iter().enumerate() {
        if milestone.id.is_empty() {
            return Err(ValidationError::EmptyMilestoneId { index });
        }
        if milestone.title.is_empty() {
            return Err(ValidationError::EmptyMilestoneTitle {
                id: milestone.id.clone(),
            });
        }
        // An omitted family is filled from the id; a stated one must agree.
        if let Ok(id) = ItemId::parse(&milestone.id) {
            if !milestone.family.is_empty() && milestone.family != id.family().to_string() {
                return Err(ValidationError::FamilyMismatch {
                    id: milestone.id.clone(),
                    family: milestone.family.clone(),
                    expected: id.family(),
                });
            }
        }
    }
    for (index, task) in roadmap.tasks.iter().enumerate() {
        if task.id.is_empty() {
            return Err(ValidationError::EmptyTaskId { index });
        }
        if task.title.is_empty() {
            return Err(ValidationError::EmptyTaskTitle { id: task.id.clone() });
        }
        if task.parent_id.is_empty() {
            return Err(ValidationError::EmptyParentId { id: task.id.clone() });
        }
    }
    Ok(())
}

fn check_unique_ids(roadmap: &Roadmap) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for milestone in &roadmap.milestones {
        if !seen.insert(milestone.id.as_str()) {
            return Err(ValidationError::DuplicateMilestoneId {
                id: milestone.id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for task in &roadmap.tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(ValidationError::DuplicateTaskId { id: task.id.clone() });
        }
    }
    Ok(())
}

fn check_parents(roadmap: &Roadmap) -> Result<(), ValidationError> {
    let known: HashSet<&str> = roadmap
        .milestones
        .iter()
        .map(|m| m.id.as_str())
        .chain(roadmap.tasks.iter().map(|t| t.id.as_str()))
        .collect();

    for task in &roadmap.tasks {
        if task.parent_id == task.id || !known.contains(task.parent_id.as_str()) {
            return Err(ValidationError::MissingParent {
                id: task.id.clone(),
                parent_id: task.parent_id.clone(),
            });
        }
    }
    Ok(())
}

fn check_enum_values(roadmap: &Roadmap) -> Result<(), ValidationError> {
    for milestone in &roadmap.milestones {
        if let Some(value) = milestone.priority.as_deref() {
            if !is_member::<Priority>(value) {
                return Err(ValidationError::InvalidPriority {
                    id: milestone.id.clone(),
                    value: value.to_string(),
                });
            }
        }
        if let Some(value) = milestone.cycle_status.as_deref() {
            if !is_member::<CycleStatus>(value) {
                return Err(ValidationError::InvalidCycleStatus {
                    id: milestone.id.clone(),
                    value: value.to_string(),
                });
            }
        }
    }
    for task in &roadmap.tasks {
        if !is_member::<TaskStatus>(&task.status) {
            return Err(ValidationError::InvalidTaskStatus {
                id: task.id.clone(),
                value: task.status.clone(),
            });
        }
        if let Some(value) = task.priority.as_deref() {
            if !is_member::<Priority>(value) {
                return Err(ValidationError::InvalidPriority {
                    id: task.id.clone(),
                    value: value.to_string(),
                });
            }
        }
    }
    Ok(())
}
