use std::io::Write;

use anyhow::{bail, Context as _, Result};
use spiral_core::commit::format_commit_message;
use spiral_core::query::{
    children_of, filter_milestones, filter_tasks, in_cycle_milestones, in_cycle_tasks, milestone_of,
    roadmap_stats, roadmap_tree,
};
use spiral_core::*;

use super::{AddMilestoneArgs, AddTaskArgs, App, ContextArgs, ShowArgs, TagArgs, View};
use crate::render::{milestone_line, render_stats, render_tree, task_line};

// ============================================================
// Overview
// ============================================================

pub fn summary(app: &App, out: &mut dyn Write) -> Result<()> {
    let roadmap = app.roadmap.load()?;
    let context = app.context.load()?;

    writeln!(out, "Roadmap: {}", app.roadmap.path().display())?;
    writeln!(
        out,
        "{} milestone(s), {} task(s), {} in cycle",
        roadmap.milestones.len(),
        roadmap.tasks.len(),
        in_cycle_tasks(&roadmap).len()
    )?;
    match context.resolve(&roadmap) {
        ContextTarget::Active { milestone, task } => {
            writeln!(out, "Context: {} {}", milestone.id, milestone.title)?;
            if let Some(task) = task {
                writeln!(out, "Task: {} {}", task.id, task.title)?;
            }
        }
        ContextTarget::Stale { id } => writeln!(out, "Context: {id} (no longer in the roadmap)")?,
        ContextTarget::Unset => writeln!(out, "Context: none")?,
    }
    if roadmap.is_empty() {
        writeln!(out, "\nGet started: spiral add milestone --title \"My milestone\"")?;
    }
    Ok(())
}

// ============================================================
// Show
// ============================================================

pub fn show(app: &App, args: &ShowArgs, out: &mut dyn Write) -> Result<()> {
    let roadmap = app.roadmap.load()?;
    let order = args.sort.map(IdOrder::from).unwrap_or(app.config.sort);

    match args.view {
        View::Tree => {
            let milestones = filter_milestones(&roadmap.milestones, &args.milestone_filter());
            if milestones.is_empty() {
                writeln!(out, "No milestones found.")?;
                return Ok(());
            }
            write!(out, "{}", render_tree(&roadmap_tree(&roadmap, &milestones, order)))?;
        }
        View::All => {
            list_milestones(&roadmap, args, order, out)?;
            writeln!(out)?;
            list_tasks(&roadmap, args, order, out)?;
        }
        View::Milestones => list_milestones(&roadmap, args, order, out)?,
        View::Tasks => list_tasks(&roadmap, args, order, out)?,
        View::Cycle => {
            let filter = args.milestone_filter();
            let milestones: Vec<&Milestone> = in_cycle_milestones(&roadmap)
                .into_iter()
                .filter(|m| filter.matches(m))
                .collect();
            if milestones.is_empty() {
                writeln!(out, "No milestones in the current cycle.")?;
                return Ok(());
            }
            write!(out, "{}", render_tree(&roadmap_tree(&roadmap, &milestones, order)))?;
            writeln!(
                out,
                "\n{} milestone(s), {} task(s) in cycle",
                milestones.len(),
                in_cycle_tasks(&roadmap).len()
            )?;
        }
        View::Stats => write!(out, "{}", render_stats(&roadmap_stats(&roadmap)))?,
    }
    Ok(())
}

fn list_milestones(roadmap: &Roadmap, args: &ShowArgs, order: IdOrder, out: &mut dyn Write) -> Result<()> {
    let mut milestones = filter_milestones(&roadmap.milestones, &args.milestone_filter());
    order.sort_milestones(&mut milestones);
    writeln!(out, "Found {} milestone(s):", milestones.len())?;
    for milestone in milestones {
        writeln!(out, "  {}", milestone_line(milestone))?;
    }
    Ok(())
}

fn list_tasks(roadmap: &Roadmap, args: &ShowArgs, order: IdOrder, out: &mut dyn Write) -> Result<()> {
    let mut tasks = filter_tasks(roadmap, &args.task_filter());
    order.sort_tasks(&mut tasks);
    writeln!(out, "Found {} task(s):", tasks.len())?;
    for task in tasks {
        writeln!(out, "  {}", task_line(task))?;
    }
    Ok(())
}

// ============================================================
// Edits
// ============================================================

pub fn add_milestone(app: &App, args: AddMilestoneArgs, out: &mut dyn Write) -> Result<()> {
    let mut roadmap = app.roadmap.load()?;
    let family = match args.family {
        Some(family) => family,
        None => app.context.load()?.family_hint(app.config.default_family),
    };

    let milestone = roadmap
        .add_milestone(CreateMilestoneInput {
            id: args.id,
            family: Some(family),
            title: args.title,
            priority: Some(args.priority),
            cycle_status: Some(args.cycle_status),
            notes: args.notes,
        })?
        .clone();
    app.roadmap.save(&roadmap)?;
    writeln!(out, "Added milestone {}: {}", milestone.id, milestone.title)?;

    if milestone.is_in_cycle() {
        app.context.save(&Context::for_milestone(&milestone))?;
        writeln!(out, "Context set to {}", milestone.id)?;
    }
    Ok(())
}

/// Add a task (`level` = Task) or subtask (`level` = Subtask).
pub fn add_task(app: &App, args: AddTaskArgs, level: Level, out: &mut dyn Write) -> Result<()> {
    let mut roadmap = app.roadmap.load()?;
    let parent_id = match args.parent {
        Some(parent) => parent,
        None => {
            let context = app.context.load()?;
            let from_context = if level == Level::Task { context.milestone_id } else { context.task_id };
            from_context.with_context(|| {
                format!("no --parent given and the context has no {} set", if level == Level::Task { "milestone" } else { "task" })
            })?
        }
    };

    let invalid_parent = |reason: String| Error::InvalidParent {
        parent: parent_id.clone(),
        reason,
    };
    let parent_level = ItemId::parse(&parent_id)
        .map_err(|e| invalid_parent(e.to_string()))?
        .level();
    let expected = if level == Level::Task { Level::Milestone } else { Level::Task };
    if parent_level != expected {
        return Err(invalid_parent(format!("a {level} needs a {expected} parent, but this is a {parent_level}")).into());
    }

    let task = roadmap
        .add_task(CreateTaskInput {
            id: args.id,
            parent_id,
            title: args.title,
            status: Some(args.status),
            priority: args.priority,
            notes: args.notes,
        })?
        .clone();
    app.roadmap.save(&roadmap)?;
    writeln!(out, "Added {level} {}: {} (parent: {})", task.id, task.title, task.parent_id)?;
    Ok(())
}

pub fn update(app: &App, id: &str, assignments: &[String], out: &mut dyn Write) -> Result<()> {
    let mut roadmap = app.roadmap.load()?;
    let edits = assignments
        .iter()
        .map(|a| {
            a.split_once('=')
                .map(|(field, value)| (field.trim(), value))
                .with_context(|| format!("expected FIELD=VALUE, got '{a}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    if roadmap.milestone(id).is_some() {
        let mut input = UpdateMilestoneInput::default();
        for (field, value) in edits {
            input.set(field, value)?;
        }
        roadmap.update_milestone(id, input)?;
    } else if roadmap.task(id).is_some() {
        let mut input = UpdateTaskInput::default();
        for (field, value) in edits {
            input.set(field, value)?;
        }
        roadmap.update_task(id, input)?;
    } else {
        return Err(Error::NotFound { kind: "item", id: id.to_string() }.into());
    }

    app.roadmap.save(&roadmap)?;
    writeln!(out, "Updated {id}")?;
    Ok(())
}

/// Remove an item and its descendants. A context pointing at a removed item
/// is left as is and reported as stale.
pub fn remove(app: &App, id: &str, out: &mut dyn Write) -> Result<()> {
    let mut roadmap = app.roadmap.load()?;
    let removed = if roadmap.milestone(id).is_some() {
        roadmap.remove_milestone(id)?
    } else if roadmap.task(id).is_some() {
        roadmap.remove_task(id)?
    } else {
        return Err(Error::NotFound { kind: "item", id: id.to_string() }.into());
    };
    app.roadmap.save(&roadmap)?;
    writeln!(out, "Removed {}", removed.join(", "))?;
    Ok(())
}

// ============================================================
// Context
// ============================================================

pub fn context(app: &App, args: ContextArgs, out: &mut dyn Write) -> Result<()> {
    if args.clear {
        app.context.clear()?;
        writeln!(out, "Context cleared")?;
        return Ok(());
    }

    let roadmap = app.roadmap.load()?;
    if args.id.is_some() || args.task.is_some() {
        let context = focus(&roadmap, args.id.as_deref(), args.task.as_deref())?;
        app.context.save(&context)?;
        tracing::debug!("Context saved to {}", app.context.path().display());
    }

    let context = app.context.load()?;
    match context.resolve(&roadmap) {
        ContextTarget::Unset => {
            writeln!(out, "No context set. Use: spiral context --id <MILESTONE>")?;
        }
        ContextTarget::Stale { id } => {
            writeln!(out, "Context points at {id}, which is no longer in the roadmap.")?;
            writeln!(out, "Run `spiral context --clear` or pick another milestone.")?;
        }
        ContextTarget::Active { milestone, task } => {
            writeln!(out, "Milestone: {}", milestone_line(milestone))?;
            if let Some(task) = task {
                writeln!(out, "Task: {}", task_line(task))?;
            }
            let focus_id = task.map_or(milestone.id.as_str(), |t| t.id.as_str());
            let children = children_of(&roadmap, focus_id, app.config.sort);
            if !children.is_empty() {
                writeln!(out, "\nTasks under {focus_id}:")?;
                for child in children {
                    writeln!(out, "  {}", task_line(child))?;
                }
            }
        }
    }
    Ok(())
}

/// Build a context for a milestone and/or task, checking both exist and agree.
fn focus(roadmap: &Roadmap, milestone_id: Option<&str>, task_id: Option<&str>) -> Result<Context> {
    let task = task_id
        .map(|id| {
            roadmap
                .task(id)
                .ok_or_else(|| Error::NotFound { kind: "task", id: id.to_string() })
        })
        .transpose()?;

    let milestone = match milestone_id {
        Some(id) => roadmap
            .milestone(id)
            .ok_or_else(|| Error::NotFound { kind: "milestone", id: id.to_string() })?,
        None => match task {
            Some(task) => milestone_of(roadmap, task)
                .with_context(|| format!("task {} does not belong to any milestone", task.id))?,
            None => bail!("nothing to focus on"),
        },
    };

    let mut context = Context::for_milestone(milestone);
    if let Some(task) = task {
        if milestone_of(roadmap, task).map(|m| m.id.as_str()) != Some(milestone.id.as_str()) {
            bail!("task {} does not belong to milestone {}", task.id, milestone.id);
        }
        context.task_id = Some(task.id.clone());
    }
    Ok(context)
}

// ============================================================
// Commit tags
// ============================================================

pub fn tag(app: &App, args: TagArgs, out: &mut dyn Write) -> Result<()> {
    let target = match args.id {
        Some(id) => id,
        None => app
            .context
            .load()?
            .focus_id()
            .map(str::to_string)
            .context("no --id given and no context set")?,
    };

    let id = if args.record {
        let mut roadmap = app.roadmap.load()?;
        let task = roadmap
            .add_task(CreateTaskInput {
                parent_id: target,
                title: args.message.clone(),
                status: Some(TaskStatus::Done),
                ..CreateTaskInput::default()
            })?
            .clone();
        app.roadmap.save(&roadmap)?;
        tracing::info!("Recorded {} under {}", task.id, task.parent_id);
        task.item_id()?
    } else {
        ItemId::parse(&target)?
    };

    writeln!(out, "{}", format_commit_message(&id, &args.message))?;
    Ok(())
}
