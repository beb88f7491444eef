use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::backend::{FsStorage, MemoryStorage, Storage};
use crate::error::{Error, Result};
use crate::models::Context;

/// Directory holding tool state, relative to the roadmap's directory.
pub const STATE_DIR: &str = ".spiral";
pub const CONTEXT_FILE: &str = "context.json";

/// Persists the single [`Context`] pointer as JSON.
#[derive(Clone)]
pub struct ContextStore {
    storage: Arc<dyn Storage>,
    path: PathBuf,
}

impl ContextStore {
    /// Context stored as `context.json` inside `state_dir`.
    pub fn new(storage: Arc<dyn Storage>, state_dir: impl AsRef<Path>) -> Self {
        Self {
            storage,
            path: state_dir.as_ref().join(CONTEXT_FILE),
        }
    }

    pub fn open(state_dir: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(FsStorage), state_dir)
    }

    pub fn open_memory(storage: MemoryStorage) -> Self {
        Self::new(Arc::new(storage), STATE_DIR)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored context, or an empty one when none has been saved.
    pub fn load(&self) -> Result<Context> {
        let bytes = self
            .storage
            .read(&self.path)
            .map_err(|e| Error::io("failed to read", &self.path, e))?;
        let Some(bytes) = bytes else {
            return Ok(Context::default());
        };
        serde_json::from_slice(&bytes).map_err(|e| Error::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, context: &Context) -> Result<()> {
        let json = serde_json::to_vec_pretty(context).map_err(|e| Error::Encode {
            what: "context",
            message: e.to_string(),
        })?;
        self.storage
            .write_atomic(&self.path, &json)
            .map_err(|e| Error::io("failed to write", &self.path, e))?;
        tracing::debug!("Saved context to {}", self.path.display());
        Ok(())
    }

    /// Forget the stored context. Clearing an absent context is not an error.
    pub fn clear(&self) -> Result<()> {
        let removed = self
            .storage
            .remove(&self.path)
            .map_err(|e| Error::io("failed to remove", &self.path, e))?;
        tracing::debug!("Cleared context (existed: {})", removed);
        Ok(())
    }
}

impl std::fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextStore").field("path", &self.path).finish()
    }
}
