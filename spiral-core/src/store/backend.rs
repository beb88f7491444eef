//! Byte-level storage backends behind the roadmap and context stores.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

/// Whole-file storage keyed by path.
pub trait Storage: Send + Sync {
    /// Contents at `path`, or `None` when nothing is stored there.
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Replace the contents at `path` so that readers see either the old or
    /// the new contents, never a mix.
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Delete `path`. Returns `false` if nothing was stored there.
    fn remove(&self, path: &Path) -> io::Result<bool>;
}

/// Local filesystem storage.
///
/// Writes go to a temporary file in the destination directory, are flushed
/// and synced, then renamed over the destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

/// A fully written temporary file waiting to be renamed into place.
///
/// Dropping it without [`StagedWrite::commit`] deletes the temporary file and
/// leaves the destination as it was.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl FsStorage {
    /// Write `contents` next to `path` without touching `path` itself.
    pub fn stage(&self, path: &Path, contents: &[u8]) -> io::Result<StagedWrite> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".spiral-tmp-")
            .tempfile_in(dir)?;
        temp.write_all(contents)?;
        temp.flush()?;
        temp.as_file().sync_all()?;

        Ok(StagedWrite {
            temp,
            destination: path.to_path_buf(),
        })
    }
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Rename the temporary file over the destination.
    ///
    /// On failure the temporary file is removed and the destination is left
    /// untouched.
    pub fn commit(self) -> io::Result<()> {
        self.temp
            .persist(&self.destination)
            .map(|_| ())
            .map_err(|e| e.error)
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.stage(path, contents)?.commit()
    }

    fn remove(&self, path: &Path) -> io::Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// In-process storage for tests and callers that need no filesystem.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path currently stored, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let files = self.files.lock().expect("storage lock poisoned");
        let mut paths: Vec<PathBuf> = files.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Storage for MemoryStorage {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        let files = self.files.lock().expect("storage lock poisoned");
        Ok(files.get(path).cloned())
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut files = self.files.lock().expect("storage lock poisoned");
        files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<bool> {
        let mut files = self.files.lock().expect("storage lock poisoned");
        Ok(files.remove(path).is_some())
    }
}
