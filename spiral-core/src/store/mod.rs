//! Persistence for the roadmap document and the context pointer.
//!
//! Both stores read and replace whole files through a [`Storage`] backend.
//! They are plain handles passed to whoever needs them; there is no global
//! state. Writes are atomic against crashes but not against two processes
//! saving at once (last writer wins).

mod backend;
mod context;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use backend::{FsStorage, MemoryStorage, StagedWrite, Storage};
pub use context::{ContextStore, CONTEXT_FILE, STATE_DIR};

use crate::error::{Error, Result};
use crate::models::Roadmap;
use crate::validate::validate;

/// Default roadmap file name.
pub const DEFAULT_ROADMAP_FILE: &str = "spiral.yml";

/// Loads and saves the YAML roadmap document at one path.
#[derive(Clone)]
pub struct RoadmapStore {
    storage: Arc<dyn Storage>,
    path: PathBuf,
}

impl RoadmapStore {
    pub fn new(storage: Arc<dyn Storage>, path: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    /// Store backed by the local filesystem.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsStorage), path)
    }

    /// Store backed by `storage` at the default file name.
    pub fn open_memory(storage: MemoryStorage) -> Self {
        Self::new(Arc::new(storage), DEFAULT_ROADMAP_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the roadmap.
    ///
    /// A missing document is not an error: an empty roadmap is written to the
    /// path and returned. An empty document also reads as an empty roadmap.
    pub fn load(&self) -> Result<Roadmap> {
        let bytes = self
            .storage
            .read(&self.path)
            .map_err(|e| Error::io("failed to read", &self.path, e))?;

        let Some(bytes) = bytes else {
            tracing::info!("No roadmap at {}, creating an empty one", self.path.display());
            let roadmap = Roadmap::new();
            self.save(&roadmap)?;
            return Ok(roadmap);
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Roadmap::new());
        }

        let roadmap: Roadmap = serde_yaml::from_slice(&bytes).map_err(|e| Error::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(
            "Loaded {} milestones and {} tasks from {}",
            roadmap.milestones.len(),
            roadmap.tasks.len(),
            self.path.display()
        );
        Ok(roadmap)
    }

    /// Validate, then atomically replace the stored document.
    ///
    /// Nothing is written when validation fails.
    pub fn save(&self, roadmap: &Roadmap) -> Result<()> {
        validate(roadmap)?;

        let yaml = serde_yaml::to_string(roadmap).map_err(|e| Error::Encode {
            what: "roadmap",
            message: e.to_string(),
        })?;
        self.storage
            .write_atomic(&self.path, yaml.as_bytes())
            .map_err(|e| Error::io("failed to write", &self.path, e))?;

        tracing::debug!("Saved roadmap to {}", self.path.display());
        Ok(())
    }
}

impl std::fmt::Debug for RoadmapStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadmapStore").field("path", &self.path).finish()
    }
}
