// src/submission.rs
//! Submission flow: validate the upload, call the analysis service, map the
//! response and record it

use std::path::Path;
use thiserror::Error;

use crate::core::{AnalysisClient, FsOps};
use crate::history::HistoryStore;
use crate::mapper::map_response;
use crate::types::{AnalysisPayload, AnalysisRecord};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// A CV upload awaiting analysis
#[derive(Debug, Clone)]
pub struct CvUpload {
    pub file_name: String,
    pub content: Vec<u8>,
    pub target_role: String,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Target role is required")]
    MissingTargetRole,

    #[error("Only PDF files are supported: {0}")]
    UnsupportedFile(String),

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("File size {size} exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    /// Transport, status, parsing and storage failures are not told apart
    #[error("Analysis failed")]
    Failed(#[from] anyhow::Error),
}

impl SubmissionError {
    pub fn is_validation(&self) -> bool {
        !matches!(self, SubmissionError::Failed(_))
    }
}

/// Check an upload before anything leaves the process
pub fn validate_upload(upload: &CvUpload) -> Result<(), SubmissionError> {
    if upload.target_role.trim().is_empty() {
        return Err(SubmissionError::MissingTargetRole);
    }

    let extension = FsOps::get_extension(Path::new(&upload.file_name));
    let allowed = extension
        .as_deref()
        .map_or(false, |ext| ALLOWED_EXTENSIONS.contains(&ext));
    if !allowed {
        return Err(SubmissionError::UnsupportedFile(upload.file_name.clone()));
    }

    let size = upload.content.len() as u64;
    if size == 0 {
        return Err(SubmissionError::EmptyFile);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(SubmissionError::FileTooLarge {
            size,
            max: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

/// Validate, analyze and normalize an upload without touching the history
pub async fn analyze_upload(
    client: &AnalysisClient,
    upload: CvUpload,
) -> Result<AnalysisPayload, SubmissionError> {
    validate_upload(&upload)?;

    let target_role = upload.target_role.trim().to_string();
    app_log!(
        info,
        "Submitting {} ({} bytes) for role {}",
        upload.file_name,
        upload.content.len(),
        target_role
    );

    let raw = client
        .analyze_cv(upload.content, &upload.file_name, &target_role)
        .await
        .map_err(|e| {
            app_log!(error, "CV analysis failed: {:#}", e);
            SubmissionError::Failed(e)
        })?;

    Ok(map_response(&target_role, raw))
}

/// Full flow: analyze then record. Either the record is saved or nothing is.
pub async fn submit_analysis(
    client: &AnalysisClient,
    store: &mut HistoryStore,
    upload: CvUpload,
) -> Result<AnalysisRecord, SubmissionError> {
    let payload = analyze_upload(client, upload).await?;
    record_analysis(store, payload).await
}

/// Persist an analyzed payload and return the stored record
pub async fn record_analysis(
    store: &mut HistoryStore,
    payload: AnalysisPayload,
) -> Result<AnalysisRecord, SubmissionError> {
    let id = store.save(payload).await.map_err(|e| {
        app_log!(error, "Failed to record analysis: {:#}", e);
        SubmissionError::Failed(e)
    })?;

    store
        .get(&id)
        .cloned()
        .ok_or_else(|| SubmissionError::Failed(anyhow::anyhow!("Saved analysis {} vanished", id)))
}
