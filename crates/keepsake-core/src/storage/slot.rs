//! The single opaque persistence slot behind the progress store.
//!
//! A slot holds one string value under one key. The store never sees
//! anything below this trait, so a browser-style key-value area, a file,
//! or an in-memory cell are interchangeable.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// File name used by [`FileSlot::in_dir`].
pub const STORAGE_KEY: &str = "anniversary_data.json";

/// One key, one value.
pub trait KeyValueSlot {
    /// Human-readable location, used in log lines and errors.
    fn location(&self) -> String;

    /// Read the stored value. `Ok(None)` means nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored value.
    fn write(&mut self, value: &str) -> Result<(), StorageError>;

    /// Delete the stored value. Removing an empty slot is not an error.
    fn remove(&mut self) -> Result<(), StorageError>;
}

/// Slot backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot stored as [`STORAGE_KEY`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STORAGE_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueSlot for FileSlot {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::ReadFailed {
                location: self.location(),
                source,
            }),
        }
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::WriteFailed {
                location: self.location(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(&self.path, value).map_err(|e| StorageError::WriteFailed {
            location: self.location(),
            message: e.to_string(),
        })
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::RemoveFailed {
                location: self.location(),
                source,
            }),
        }
    }
}

/// In-process slot. Useful for tests and for embedding the engine without
/// touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
    reject_writes: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with raw contents (possibly garbage).
    pub fn with_contents(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            reject_writes: false,
        }
    }

    /// Simulate a full quota: every write fails, reads still work.
    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    pub fn contents(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl KeyValueSlot for MemorySlot {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::WriteFailed {
                location: self.location(),
                message: "quota exceeded".to_string(),
            });
        }
        self.value = Some(value.to_string());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StorageError> {
        self.value = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_slot_missing_file_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSlot::in_dir(temp_dir.path());
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn file_slot_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let mut slot = FileSlot::in_dir(temp_dir.path());
        slot.write("{\"a\":1}").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(temp_dir.path().join(STORAGE_KEY).exists());
    }

    #[test]
    fn file_slot_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested/path/data.json");
        let mut slot = FileSlot::new(&nested);
        slot.write("x").unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn file_slot_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut slot = FileSlot::in_dir(temp_dir.path());
        slot.write("x").unwrap();
        slot.remove().unwrap();
        slot.remove().unwrap();
        assert!(slot.read().unwrap().is_none());
    }

    #[test]
    fn memory_slot_rejects_writes_when_full() {
        let mut slot = MemorySlot::with_contents("old");
        slot.set_reject_writes(true);
        assert!(matches!(slot.write("new"), Err(StorageError::WriteFailed { .. })));
        assert_eq!(slot.contents(), Some("old"));
    }
}
