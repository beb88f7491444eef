//! Plain-text output for roadmap listings.

use std::fmt::Write as _;

use spiral_core::query::{RoadmapStats, TreeItem, TreeNode};
use spiral_core::{Milestone, Task, TaskStatus};

const PLANNED: char = '○';
const IN_PROGRESS: char = '◐';
const DONE: char = '●';
const BLOCKED: char = '✗';
const UNKNOWN: char = '?';

/// Status symbol for a task. Empty status reads as planned.
fn status_symbol(task: &Task) -> char {
    if task.status.is_empty() {
        return PLANNED;
    }
    match task.task_status() {
        Some(TaskStatus::Planned) => PLANNED,
        Some(TaskStatus::InProgress) => IN_PROGRESS,
        Some(TaskStatus::Done) => DONE,
        Some(TaskStatus::Blocked) => BLOCKED,
        None => UNKNOWN,
    }
}

/// Render milestones with their tasks and subtasks.
///
/// ```text
/// D1 Authentication [in-cycle]
/// ├── ● D1.1 Password login
/// ├── ◐ D1.2 OAuth
/// │   ├── ○ D1.2.1 Google provider
/// │   └── ○ D1.2.2 GitHub provider
/// └── ✗ D1.3 Legacy basic auth
/// ```
pub fn render_tree(nodes: &[TreeNode<'_>]) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(&mut output, node, "", true, true);
    }
    output
}

fn render_node(output: &mut String, node: &TreeNode<'_>, prefix: &str, is_last: bool, is_root: bool) {
    match node.item {
        TreeItem::Milestone(milestone) => {
            output.push_str(prefix);
            output.push_str(&milestone_heading(milestone));
        }
        TreeItem::Task(task) => {
            let branch = if is_last { "└── " } else { "├── " };
            let _ = write!(output, "{prefix}{branch}{} {} {}", status_symbol(task), task.id, task.title);
        }
    }
    output.push('\n');

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{prefix}{continuation}")
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

fn milestone_heading(milestone: &Milestone) -> String {
    let mut line = format!("{} {}", milestone.id, milestone.title);
    if milestone.is_in_cycle() {
        line.push_str(" [in-cycle]");
    }
    line
}

/// One-line summary of a milestone for flat listings.
pub fn milestone_line(milestone: &Milestone) -> String {
    let mut line = format!("{} {}", milestone.id, milestone.title);
    let mut details = Vec::new();
    if let Some(priority) = milestone.priority.as_deref().filter(|p| !p.is_empty()) {
        details.push(format!("priority: {priority}"));
    }
    details.push(format!(
        "cycle: {}",
        milestone.cycle_status.as_deref().filter(|c| !c.is_empty()).unwrap_or("planned")
    ));
    details.push(format!("status: {}", milestone.status()));
    let _ = write!(line, " ({})", details.join(", "));
    line
}

/// One-line summary of a task for flat listings.
pub fn task_line(task: &Task) -> String {
    let status = if task.status.is_empty() { "planned" } else { &task.status };
    let mut line = format!("{} {} {} [{}] (parent: {})", status_symbol(task), task.id, task.title, status, task.parent_id);
    if let Some(priority) = task.priority.as_deref().filter(|p| !p.is_empty()) {
        let _ = write!(line, " priority: {priority}");
    }
    line
}

pub fn render_stats(stats: &RoadmapStats) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Milestones: {}", stats.total_milestones);
    for (status, count) in &stats.milestones_by_cycle_status {
        let _ = writeln!(output, "  {status}: {count}");
    }
    let _ = writeln!(output, "Tasks: {}", stats.total_tasks);
    for (status, count) in &stats.tasks_by_status {
        let _ = writeln!(output, "  {status}: {count}");
    }
    let _ = writeln!(output, "In cycle: {} task(s)", stats.in_cycle_tasks);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use spiral_core::query::{roadmap_tree, IdOrder};
    use spiral_core::Roadmap;

    fn make_milestone(id: &str, title: &str, cycle_status: Option<&str>) -> Milestone {
        Milestone {
            id: id.to_string(),
            family: id[..1].to_string(),
            title: title.to_string(),
            priority: None,
            cycle_status: cycle_status.map(str::to_string),
            status: None,
            notes: None,
            metadata: Default::default(),
        }
    }

    fn make_task(id: &str, parent_id: &str, title: &str, status: &str) -> Task {
        Task {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            status: status.to_string(),
            priority: None,
            notes: None,
            metadata: Default::default(),
        }
    }

    fn render(roadmap: &Roadmap) -> String {
        let milestones: Vec<&Milestone> = roadmap.milestones.iter().collect();
        render_tree(&roadmap_tree(roadmap, &milestones, IdOrder::Natural))
    }

    #[test]
    fn test_single_root() {
        let roadmap = Roadmap {
            milestones: vec![make_milestone("D1", "Authentication", None)],
            tasks: vec![],
        };
        assert_eq!(render(&roadmap), "D1 Authentication\n");
    }

    #[test]
    fn test_nested_children() {
        let roadmap = Roadmap {
            milestones: vec![make_milestone("D1", "Authentication", Some("in-cycle"))],
            tasks: vec![
                make_task("D1.1", "D1", "Password login", "done"),
                make_task("D1.2", "D1", "OAuth", "in-progress"),
                make_task("D1.2.1", "D1.2", "Google provider", ""),
                make_task("D1.2.2", "D1.2", "GitHub provider", "planned"),
                make_task("D1.3", "D1", "Legacy basic auth", "blocked"),
            ],
        };
        assert_eq!(
            render(&roadmap),
            "D1 Authentication [in-cycle]\n\
             ├── ● D1.1 Password login\n\
             ├── ◐ D1.2 OAuth\n\
             │   ├── ○ D1.2.1 Google provider\n\
             │   └── ○ D1.2.2 GitHub provider\n\
             └── ✗ D1.3 Legacy basic auth\n"
        );
    }

    #[test]
    fn test_children_in_natural_order() {
        let roadmap = Roadmap {
            milestones: vec![make_milestone("D1", "Root", None)],
            tasks: vec![
                make_task("D1.10", "D1", "Tenth", "planned"),
                make_task("D1.2", "D1", "Second", "planned"),
            ],
        };
        assert_eq!(render(&roadmap), "D1 Root\n├── ○ D1.2 Second\n└── ○ D1.10 Tenth\n");
    }

    #[test]
    fn test_unknown_status_symbol() {
        let task = make_task("D1.1", "D1", "Odd", "someday");
        assert_eq!(task_line(&task), "? D1.1 Odd [someday] (parent: D1)");
    }

    #[test]
    fn test_milestone_line_defaults() {
        let milestone = make_milestone("E2", "Export", None);
        assert_eq!(milestone_line(&milestone), "E2 Export (cycle: planned, status: planned)");
    }
}
