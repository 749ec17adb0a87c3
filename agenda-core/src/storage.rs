//! Persistent key-value storage for the serialized event list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AgendaError, AgendaResult};

/// A key-value blob store that survives between sessions.
pub trait Storage {
    fn read(&self, key: &str) -> AgendaResult<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> AgendaResult<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> AgendaResult<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn write(&mut self, key: &str, value: &str) -> AgendaResult<()> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path(key);
        let temp = self.dir.join(format!("{key}.json.tmp"));

        // Write-then-rename so a crash never leaves a half-written file
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

/// In-memory storage, for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose writes always fail.
    pub fn read_only() -> Self {
        MemoryStorage {
            entries: HashMap::new(),
            read_only: true,
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> AgendaResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> AgendaResult<()> {
        if self.read_only {
            return Err(AgendaError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("storage is read-only, cannot write '{key}'"),
            )));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
