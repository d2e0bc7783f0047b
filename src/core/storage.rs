// src/core/storage.rs
//! Slot-based persistent storage. A slot is a named key holding one serialized
//! value, the shape of browser local storage.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::core::FsOps;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read a slot, `None` when it was never written or was removed
    async fn read(&self, slot: &str) -> Result<Option<String>>;

    /// Overwrite a slot with `value`
    async fn write(&self, slot: &str, value: &str) -> Result<()>;

    /// Remove a slot entirely
    async fn remove(&self, slot: &str) -> Result<()>;
}

// ===== In-memory backend =====

/// Process-local backend, used in tests and when persistence is disabled
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot, handy for loading fixtures
    pub fn with_slot(self, slot: &str, value: &str) -> Self {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(slot.to_string(), value.to_string());
        }
        self
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots
            .lock()
            .map(|slots| slots.contains_key(slot))
            .unwrap_or(false)
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn read(&self, slot: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        Ok(slots.get(slot).cloned())
    }

    async fn write(&self, slot: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        slots.remove(slot);
        Ok(())
    }
}

// ===== File backend =====

/// One `<slot>.json` file per slot under a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path backing `slot`
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            anyhow::bail!("Invalid storage slot name: {:?}", slot);
        }
        Ok(self.root.join(format!("{}.json", slot)))
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn read(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        FsOps::read_file_optional(&path)
            .await
            .with_context(|| format!("Failed to read storage slot {}", slot))
    }

    async fn write(&self, slot: &str, value: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        FsOps::write_file_atomic(&path, value)
            .await
            .with_context(|| format!("Failed to write storage slot {}", slot))
    }

    async fn remove(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        FsOps::remove_file_if_exists(&path).await?;
        Ok(())
    }
}
