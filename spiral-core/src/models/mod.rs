//! Domain models for spiral roadmaps.
//!
//! # Core Concepts
//!
//! - [`Milestone`]: A top-level goal identified by a family letter and number (`D3`).
//! - [`Task`]: Work under a milestone (`D3.1`) or, as a subtask, under a task (`D3.1.2`).
//! - [`Roadmap`]: The aggregate persisted as one document.
//! - [`Context`]: The operator's current focus, persisted separately from the roadmap.
//!
//! Input types (`Create*Input`, `Update*Input`) carry typed values; stored
//! records keep enum fields as text so hand-edited documents can be loaded
//! and then validated.

mod context;
mod milestone;
mod roadmap;
mod task;
mod values;

pub use context::*;
pub use milestone::*;
pub use roadmap::*;
pub use task::*;
pub use values::{CycleStatus, Priority, TaskStatus};

pub(crate) use values::is_member;
