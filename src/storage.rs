//! Durable storage for the credential token
//!
//! [`TokenStore`] is the persistence port the auth store writes
//! through. It deals in the serialized token only; parsing is the
//! caller's concern, so a corrupt entry can be recovered from instead
//! of failing the read.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Persistence port for the serialized credential token.
pub trait TokenStore {
    /// Read the stored entry, `None` if nothing is stored.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored entry.
    fn save(&self, raw: &str) -> Result<()>;

    /// Delete the stored entry. Clearing an empty store is not an
    /// error.
    fn clear(&self) -> Result<()>;
}

/// Token stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, raw).map_err(|e| {
            Error::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })?;
        debug!("Saved token to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed token file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!(
                "Failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

/// In-memory store. Clones share the same slot, so a test can keep a
/// handle and inspect what the auth store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `raw`.
    #[must_use]
    pub fn with_entry(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| Error::Storage("token slot poisoned".into()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, raw: &str) -> Result<()> {
        *self.lock()? = Some(raw.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
