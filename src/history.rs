// src/history.rs
//! Persisted analysis history, newest first

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::storage::StorageBackend;
use crate::types::{AnalysisPayload, AnalysisRecord};

/// Storage slot holding the serialized history
pub const HISTORY_SLOT: &str = "career-compass-history";

pub const HISTORY_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct PersistedHistoryRef<'a> {
    version: u32,
    records: &'a [AnalysisRecord],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedHistory {
    // Unversioned bare array
    Legacy(Vec<AnalysisRecord>),
    Versioned {
        version: u32,
        records: Vec<AnalysisRecord>,
    },
}

/// Decode a persisted history slot
pub fn decode_history(raw: &str) -> Result<Vec<AnalysisRecord>> {
    let persisted: PersistedHistory =
        serde_json::from_str(raw).context("Failed to parse persisted history")?;

    match persisted {
        PersistedHistory::Versioned { version, records } => {
            if version > HISTORY_SCHEMA_VERSION {
                anyhow::bail!(
                    "Unsupported history schema version {} (max {})",
                    version,
                    HISTORY_SCHEMA_VERSION
                );
            }
            Ok(records)
        }
        PersistedHistory::Legacy(records) => Ok(records),
    }
}

/// Encode records in the current versioned layout
pub fn encode_history(records: &[AnalysisRecord]) -> Result<String> {
    serde_json::to_string(&PersistedHistoryRef {
        version: HISTORY_SCHEMA_VERSION,
        records,
    })
    .context("Failed to serialize history")
}

/// Owned history log. Every mutation rewrites the whole slot before it
/// returns; a failed write leaves the in-memory list untouched.
pub struct HistoryStore {
    backend: Arc<dyn StorageBackend>,
    slot: String,
    records: Vec<AnalysisRecord>,
}

impl HistoryStore {
    /// Load the history from `backend`. Unreadable or corrupt data yields an
    /// empty store.
    pub async fn init(backend: Arc<dyn StorageBackend>) -> Self {
        Self::init_with_slot(backend, HISTORY_SLOT).await
    }

    pub async fn init_with_slot(backend: Arc<dyn StorageBackend>, slot: &str) -> Self {
        let records = match backend.read(slot).await {
            Ok(Some(raw)) => match decode_history(&raw) {
                Ok(records) => records,
                Err(e) => {
                    app_log!(warn, "Discarding unreadable history in {}: {:#}", slot, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                app_log!(warn, "Failed to load history from {}: {:#}", slot, e);
                Vec::new()
            }
        };

        app_log!(info, "History loaded: {} record(s)", records.len());

        Self {
            backend,
            slot: slot.to_string(),
            records,
        }
    }

    /// Records, newest first
    pub fn list(&self) -> &[AnalysisRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AnalysisRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Record a new analysis and return its id
    pub async fn save(&mut self, payload: AnalysisPayload) -> Result<String> {
        let id = self.next_id();
        let record = AnalysisRecord::new(id.clone(), Utc::now(), payload);

        self.records.insert(0, record);
        if let Err(e) = self.flush().await {
            self.records.remove(0);
            return Err(e);
        }

        app_log!(info, "Saved analysis {} ({} in history)", id, self.records.len());
        Ok(id)
    }

    /// Remove a record. Unknown ids are ignored.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let Some(position) = self.records.iter().position(|record| record.id == id) else {
            return Ok(());
        };

        let removed = self.records.remove(position);
        if let Err(e) = self.flush().await {
            self.records.insert(position, removed);
            return Err(e);
        }

        app_log!(info, "Deleted analysis {}", id);
        Ok(())
    }

    /// Drop every record and the persisted slot itself
    pub async fn clear(&mut self) -> Result<()> {
        self.backend
            .remove(&self.slot)
            .await
            .context("Failed to clear history")?;
        self.records.clear();

        app_log!(info, "History cleared");
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let encoded = encode_history(&self.records)?;
        self.backend
            .write(&self.slot, &encoded)
            .await
            .context("Failed to persist history")
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::now_v7().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
