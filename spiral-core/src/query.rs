//! Read-only views over a roadmap: filtering, ordering, hierarchy and cycle
//! queries. Nothing here mutates the roadmap.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::id::ItemId;
use crate::models::{CycleStatus, Milestone, Roadmap, Task};

/// How ids are ordered in listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdOrder {
    /// Family, then each number numerically: `D2` before `D10`.
    #[default]
    Natural,
    /// Plain text order: `D10` before `D2`.
    Lexicographic,
}

impl IdOrder {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Lexicographic => a.cmp(b),
            Self::Natural => match (ItemId::parse(a), ItemId::parse(b)) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                // Malformed ids sort after well-formed ones.
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            },
        }
    }

    pub fn sort_milestones(&self, milestones: &mut [&Milestone]) {
        milestones.sort_by(|a, b| self.compare(&a.id, &b.id));
    }

    pub fn sort_tasks(&self, tasks: &mut [&Task]) {
        tasks.sort_by(|a, b| self.compare(&a.id, &b.id));
    }
}

/// Equality filter on milestones. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct MilestoneFilter {
    pub id: Option<String>,
    pub family: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub cycle_status: Option<String>,
}

impl MilestoneFilter {
    pub fn matches(&self, milestone: &Milestone) -> bool {
        field_matches(&self.id, Some(&milestone.id))
            && field_matches(&self.family, Some(&milestone.family))
            && field_matches(&self.priority, milestone.priority.as_ref())
            && field_matches(&self.status, Some(&milestone.status().to_string()))
            && field_matches(&self.cycle_status, milestone.cycle_status.as_ref())
    }
}

/// Equality filter on tasks and subtasks. Unset fields match everything.
///
/// `family` and `cycle_status` are checked against the milestone the task
/// belongs to, so they need the roadmap (see [`filter_tasks`]).
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub family: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub cycle_status: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, roadmap: &Roadmap, task: &Task) -> bool {
        if !(field_matches(&self.id, Some(&task.id))
            && field_matches(&self.parent_id, Some(&task.parent_id))
            && field_matches(&self.priority, task.priority.as_ref())
            && field_matches(&self.status, Some(&task.status)))
        {
            return false;
        }
        if self.family.is_none() && self.cycle_status.is_none() {
            return true;
        }
        let milestone = milestone_of(roadmap, task);
        let family = match milestone {
            Some(m) => Some(m.family.clone()),
            None => ItemId::parse(&task.id).ok().map(|id| id.family().to_string()),
        };
        field_matches(&self.family, family.as_ref())
            && field_matches(&self.cycle_status, milestone.and_then(|m| m.cycle_status.as_ref()))
    }
}

fn field_matches(wanted: &Option<String>, actual: Option<&String>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted),
    }
}

pub fn filter_milestones<'a>(milestones: &'a [Milestone], filter: &MilestoneFilter) -> Vec<&'a Milestone> {
    milestones.iter().filter(|m| filter.matches(m)).collect()
}

pub fn filter_tasks<'a>(roadmap: &'a Roadmap, filter: &TaskFilter) -> Vec<&'a Task> {
    roadmap
        .tasks
        .iter()
        .filter(|t| filter.matches(roadmap, t))
        .collect()
}

/// Direct children of `parent_id`, sorted by `order`.
pub fn children_of<'a>(roadmap: &'a Roadmap, parent_id: &str, order: IdOrder) -> Vec<&'a Task> {
    let mut children: Vec<&Task> = roadmap
        .tasks
        .iter()
        .filter(|t| t.parent_id == parent_id)
        .collect();
    order.sort_tasks(&mut children);
    children
}

/// The milestone a task or subtask ultimately belongs to.
///
/// Follows `parent_id` links through tasks until a milestone is reached.
/// Returns `None` for orphans and for parent cycles in hand-edited data.
pub fn milestone_of<'a>(roadmap: &'a Roadmap, task: &Task) -> Option<&'a Milestone> {
    let mut seen = HashSet::new();
    let mut parent_id = task.parent_id.as_str();
    loop {
        if let Some(milestone) = roadmap.milestone(parent_id) {
            return Some(milestone);
        }
        if !seen.insert(parent_id) {
            return None;
        }
        parent_id = roadmap.task(parent_id)?.parent_id.as_str();
    }
}

/// Tasks and subtasks whose milestone is in the current cycle, in document order.
pub fn in_cycle_tasks(roadmap: &Roadmap) -> Vec<&Task> {
    roadmap
        .tasks
        .iter()
        .filter(|t| milestone_of(roadmap, t).is_some_and(Milestone::is_in_cycle))
        .collect()
}

pub fn in_cycle_milestones(roadmap: &Roadmap) -> Vec<&Milestone> {
    roadmap.milestones.iter().filter(|m| m.is_in_cycle()).collect()
}

/// One level of the milestone → task → subtask hierarchy.
#[derive(Debug, Clone, Copy)]
pub enum TreeItem<'a> {
    Milestone(&'a Milestone),
    Task(&'a Task),
}

#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    pub item: TreeItem<'a>,
    pub children: Vec<TreeNode<'a>>,
}

impl TreeNode<'_> {
    pub fn id(&self) -> &str {
        match self.item {
            TreeItem::Milestone(m) => &m.id,
            TreeItem::Task(t) => &t.id,
        }
    }

    pub fn title(&self) -> &str {
        match self.item {
            TreeItem::Milestone(m) => &m.title,
            TreeItem::Task(t) => &t.title,
        }
    }
}

/// The roadmap as a forest of milestones with nested tasks.
///
/// Tasks whose parent does not exist are left out.
pub fn roadmap_tree<'a>(roadmap: &'a Roadmap, milestones: &[&'a Milestone], order: IdOrder) -> Vec<TreeNode<'a>> {
    fn build<'a>(roadmap: &'a Roadmap, id: &str, order: IdOrder, depth: usize) -> Vec<TreeNode<'a>> {
        if depth > 2 {
            return Vec::new();
        }
        children_of(roadmap, id, order)
            .into_iter()
            .map(|task| TreeNode {
                item: TreeItem::Task(task),
                children: build(roadmap, &task.id, order, depth + 1),
            })
            .collect()
    }

    let mut milestones = milestones.to_vec();
    order.sort_milestones(&mut milestones);
    milestones
        .into_iter()
        .map(|m| TreeNode {
            item: TreeItem::Milestone(m),
            children: build(roadmap, &m.id, order, 1),
        })
        .collect()
}

/// Summary counts over a roadmap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoadmapStats {
    pub total_milestones: usize,
    pub total_tasks: usize,
    /// Keyed by cycle status; an unset cycle status counts as `planned`.
    pub milestones_by_cycle_status: BTreeMap<String, usize>,
    /// Keyed by task status; an empty status counts as `planned`.
    pub tasks_by_status: BTreeMap<String, usize>,
    pub in_cycle_tasks: usize,
}

pub fn roadmap_stats(roadmap: &Roadmap) -> RoadmapStats {
    let planned = CycleStatus::Planned.as_str();
    let mut stats = RoadmapStats {
        total_milestones: roadmap.milestones.len(),
        total_tasks: roadmap.tasks.len(),
        in_cycle_tasks: in_cycle_tasks(roadmap).len(),
        ..RoadmapStats::default()
    };
    for milestone in &roadmap.milestones {
        let status = match milestone.cycle_status.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => planned,
        };
        *stats
            .milestones_by_cycle_status
            .entry(status.to_string())
            .or_default() += 1;
    }
    for task in &roadmap.tasks {
        let status = if task.status.is_empty() { planned } else { task.status.as_str() };
        *stats.tasks_by_status.entry(status.to_string()).or_default() += 1;
    }
    stats
}
