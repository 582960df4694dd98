//! Boolean flag persistence.
//!
//! The demo-mode switch is the only state that survives a reload. The
//! backing storage belongs to the host, so it sits behind [`FlagStore`].

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::StoreError;

pub trait FlagStore: Send + Sync {
    /// `Ok(None)` when the key was never written.
    fn get_flag(&self, key: &str) -> Result<Option<bool>, StoreError>;
    fn set_flag(&self, key: &str, value: bool) -> Result<(), StoreError>;
}

/// Process-local flags, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: Mutex<BTreeMap<String, bool>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get_flag(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self
            .flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied())
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Flags kept as a flat JSON object in a single file.
#[derive(Debug)]
pub struct JsonFileFlagStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, bool>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl FlagStore for JsonFileFlagStore {
    fn get_flag(&self, key: &str) -> Result<Option<bool>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.get(key).copied())
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut flags = self.read_all()?;
        flags.insert(key.to_string(), value);
        fs::write(&self.path, serde_json::to_string_pretty(&flags)?)?;
        debug!(path = %self.path.display(), key, value, "Persisted flag");
        Ok(())
    }
}
