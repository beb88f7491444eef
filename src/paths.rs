//! Roadmap file discovery.

use std::path::{Path, PathBuf};

use spiral_core::store::{DEFAULT_ROADMAP_FILE, STATE_DIR};

use crate::config::SpiralConfig;

/// File names tried, in order, when no roadmap path is configured.
pub const ROADMAP_CANDIDATES: [&str; 6] = [
    "spiral.yml",
    "roadmap.yml",
    "milestones.yml",
    "spiral.yaml",
    "roadmap.yaml",
    "milestones.yaml",
];

/// The first existing candidate in `dir`, or `dir/spiral.yml`.
pub fn find_roadmap_file(dir: &Path) -> PathBuf {
    ROADMAP_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| dir.join(DEFAULT_ROADMAP_FILE))
}

/// Explicit flag, then configuration, then discovery in `cwd`.
pub fn resolve_roadmap_path(flag: Option<PathBuf>, config: &SpiralConfig, cwd: &Path) -> PathBuf {
    flag.or_else(|| config.roadmap.clone())
        .unwrap_or_else(|| find_roadmap_file(cwd))
}

/// Configured state directory, else `.spiral` beside the roadmap file.
pub fn state_dir(roadmap: &Path, config: &SpiralConfig) -> PathBuf {
    if let Some(dir) = &config.state_dir {
        return dir.clone();
    }
    match roadmap.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(STATE_DIR),
        _ => PathBuf::from(STATE_DIR),
    }
}
