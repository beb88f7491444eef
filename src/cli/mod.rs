//! Command-line surface: clap definitions and dispatch.

mod handlers;

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use spiral_core::query::{MilestoneFilter, TaskFilter};
use spiral_core::{ContextStore, CycleStatus, IdOrder, Priority, RoadmapStore, TaskStatus};

use crate::config::SpiralConfig;

#[derive(Parser)]
#[command(name = "spiral", version)]
#[command(about = "Hierarchical roadmap tracking for git-native development")]
pub struct Cli {
    /// Roadmap file. Defaults to spiral.yml, roadmap.yml or milestones.yml in the current directory
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display milestones, tasks, the current cycle or summary counts
    Show(ShowArgs),
    /// Add a milestone, task or subtask
    Add {
        #[command(subcommand)]
        item: AddItem,
    },
    /// Edit fields of a milestone or task
    Update {
        /// Milestone or task id
        id: String,
        /// Edits such as title="New title" or priority=high. An empty value clears the field
        #[arg(required = true, value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
    },
    /// Remove a milestone or task together with everything beneath it
    Remove {
        /// Milestone or task id
        id: String,
    },
    /// Show, set or clear the working context
    Context(ContextArgs),
    /// Print a commit message prefixed with a roadmap id
    Tag(TagArgs),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Milestones with their tasks as a tree
    #[default]
    Tree,
    /// Flat listing of milestones, then tasks
    All,
    Milestones,
    Tasks,
    /// In-cycle milestones and their tasks
    Cycle,
    Stats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// D2 before D10
    Natural,
    /// Plain string order
    Lexicographic,
}

impl From<SortOrder> for IdOrder {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Natural => IdOrder::Natural,
            SortOrder::Lexicographic => IdOrder::Lexicographic,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    #[arg(value_enum, default_value_t = View::Tree)]
    pub view: View,

    /// Only the item with this id
    #[arg(long)]
    pub id: Option<String>,

    /// Only items in this family (the id's leading letter)
    #[arg(long)]
    pub family: Option<String>,

    #[arg(long)]
    pub priority: Option<Priority>,

    /// Milestone or task status
    #[arg(long)]
    pub status: Option<String>,

    /// Cycle status of the milestone (or the task's milestone)
    #[arg(long)]
    pub cycle_status: Option<CycleStatus>,

    /// Only tasks directly under this parent id
    #[arg(long)]
    pub parent: Option<String>,

    /// Id ordering. Defaults to the configured order
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,
}

impl ShowArgs {
    fn milestone_filter(&self) -> MilestoneFilter {
        MilestoneFilter {
            id: self.id.clone(),
            family: self.family.clone(),
            priority: self.priority.map(|p| p.as_str().to_string()),
            status: self.status.clone(),
            cycle_status: self.cycle_status.map(|c| c.as_str().to_string()),
        }
    }

    fn task_filter(&self) -> TaskFilter {
        TaskFilter {
            id: self.id.clone(),
            parent_id: self.parent.clone(),
            family: self.family.clone(),
            priority: self.priority.map(|p| p.as_str().to_string()),
            status: self.status.clone(),
            cycle_status: self.cycle_status.map(|c| c.as_str().to_string()),
        }
    }
}

#[derive(Subcommand)]
pub enum AddItem {
    /// Add a milestone. The id is generated unless --id is given
    Milestone(AddMilestoneArgs),
    /// Add a task under a milestone (defaults to the context milestone)
    Task(AddTaskArgs),
    /// Add a subtask under a task (defaults to the context task)
    Subtask(AddTaskArgs),
}

#[derive(Args, Debug)]
pub struct AddMilestoneArgs {
    #[arg(long)]
    pub title: String,

    /// Explicit milestone id such as D4
    #[arg(long)]
    pub id: Option<String>,

    /// Family letter for the generated id
    #[arg(long)]
    pub family: Option<char>,

    #[arg(long, default_value = "medium")]
    pub priority: Priority,

    /// An in-cycle milestone also becomes the working context
    #[arg(long, default_value = "planned")]
    pub cycle_status: CycleStatus,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddTaskArgs {
    #[arg(long)]
    pub title: String,

    /// Parent id. Falls back to the working context
    #[arg(long)]
    pub parent: Option<String>,

    /// Explicit id directly under the parent
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long, default_value = "planned")]
    pub status: TaskStatus,

    #[arg(long)]
    pub priority: Option<Priority>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Milestone to focus on
    #[arg(long)]
    pub id: Option<String>,

    /// Task to focus on within the milestone
    #[arg(long)]
    pub task: Option<String>,

    /// Forget the working context
    #[arg(long, conflicts_with_all = ["id", "task"])]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    pub message: String,

    /// Id to tag with. Defaults to the context task, then the context milestone
    #[arg(long)]
    pub id: Option<String>,

    /// Also record the message as a done task under the tagged item
    #[arg(long)]
    pub record: bool,
}

/// Stores and settings a command runs against.
pub struct App {
    pub roadmap: RoadmapStore,
    pub context: ContextStore,
    pub config: SpiralConfig,
}

impl App {
    /// Run `command`, writing user-facing output to `out`.
    pub fn run(&self, command: Option<Commands>, out: &mut dyn Write) -> anyhow::Result<()> {
        match command {
            None => handlers::summary(self, out),
            Some(Commands::Show(args)) => handlers::show(self, &args, out),
            Some(Commands::Add { item }) => match item {
                AddItem::Milestone(args) => handlers::add_milestone(self, args, out),
                AddItem::Task(args) => handlers::add_task(self, args, spiral_core::Level::Task, out),
                AddItem::Subtask(args) => handlers::add_task(self, args, spiral_core::Level::Subtask, out),
            },
            Some(Commands::Update { id, assignments }) => handlers::update(self, &id, &assignments, out),
            Some(Commands::Remove { id }) => handlers::remove(self, &id, out),
            Some(Commands::Context(args)) => handlers::context(self, args, out),
            Some(Commands::Tag(args)) => handlers::tag(self, args, out),
        }
    }
}
