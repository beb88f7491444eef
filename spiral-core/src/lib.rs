//! Core of the spiral roadmap tracker.
//!
//! A roadmap is a hierarchy of milestones (`D3`), tasks (`D3.1`) and subtasks
//! (`D3.1.2`) kept in one human-editable YAML document. This crate holds the
//! id scheme, the data model and its invariants, atomic persistence, the
//! working-context pointer and read-only queries. Terminal output, argument
//! parsing and version control live in the `spiral` binary.

pub mod commit;
mod edit;
pub mod error;
pub mod generator;
pub mod id;
pub mod models;
pub mod query;
pub mod store;
pub mod validate;

pub use error::{Error, Result, ValidationError};
pub use generator::IdGenerator;
pub use id::{ItemId, Level};
pub use models::*;
pub use query::IdOrder;
pub use store::{ContextStore, FsStorage, MemoryStorage, RoadmapStore, Storage};
pub use validate::validate;
