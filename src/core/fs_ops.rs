// src/core/fs_ops.rs
//! File system operations used by the file storage backend

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            app_log!(info, "Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Read a file, `None` when it does not exist
    pub async fn read_file_optional(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read file: {}", path.display()))
            }
        }
    }

    /// Write through a sibling temp file and rename, so readers never see a
    /// half-written log
    pub async fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        let temp_path = Self::temp_sibling(path);

        fs::write(&temp_path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", temp_path.display()))?;

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e)
                .with_context(|| format!("Failed to replace file: {}", path.display()));
        }

        app_log!(debug, "Written file: {}", path.display());
        Ok(())
    }

    /// Remove a file, missing files are fine
    pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
        match fs::remove_file(path).await {
            Ok(()) => {
                app_log!(info, "Removed file: {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove file: {}", path.display()))
            }
        }
    }

    /// Get file extension in lowercase
    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Resolve `relative` against `base` unless it is already absolute
    pub fn normalize_path(base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.join(relative)
        }
    }

    fn temp_sibling(path: &Path) -> PathBuf {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("slot");
        path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
    }
}
