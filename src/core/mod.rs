// src/core/mod.rs
//! Core services: configuration, storage backends and the analysis client

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod service_client;
pub mod storage;

pub use config_manager::{ConfigManager, StorageKind};
pub use database::Database;
pub use fs_ops::FsOps;
pub use service_client::AnalysisClient;
pub use storage::{FileStorage, MemoryStorage, StorageBackend};

use anyhow::Result;
use std::sync::Arc;

/// Open the storage backend selected in configuration
pub async fn open_storage(config: &ConfigManager) -> Result<Arc<dyn StorageBackend>> {
    let backend: Arc<dyn StorageBackend> = match config.storage.backend {
        StorageKind::File => {
            let storage = FileStorage::new(config.environment.data_path.clone());
            app_log!(info, "History storage: files in {}", storage.root().display());
            Arc::new(storage)
        }
        StorageKind::Sqlite => {
            let database = Database::new(&config.environment.database_path).await?;
            app_log!(
                info,
                "History storage: sqlite at {}",
                config.environment.database_path.display()
            );
            Arc::new(database)
        }
        StorageKind::Memory => {
            app_log!(warn, "History storage: in-memory, nothing survives a restart");
            Arc::new(MemoryStorage::new())
        }
    };
    Ok(backend)
}
