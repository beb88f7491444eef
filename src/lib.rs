//! The `spiral` command-line tool: configuration, roadmap discovery, output
//! rendering and command handlers on top of `spiral-core`.

pub mod cli;
pub mod config;
pub mod paths;
pub mod render;
