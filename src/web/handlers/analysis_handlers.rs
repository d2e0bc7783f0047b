// src/web/handlers/analysis_handlers.rs
//! CV upload and analysis handler

use rocket::form::Form;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tokio::io::AsyncReadExt;

use crate::submission::{analyze_upload, record_analysis, CvUpload, SubmissionError, MAX_UPLOAD_BYTES};
use crate::types::AnalysisRecord;
use crate::web::types::{AnalyzeForm, ApiError, AppState, DataResponse, StandardErrorResponse};

pub async fn analyze_handler(
    upload: Form<AnalyzeForm<'_>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<AnalysisRecord>>, ApiError> {
    let cv_upload = read_upload(upload).await?;

    // The remote call runs without holding the history lock
    let payload = analyze_upload(&state.client, cv_upload)
        .await
        .map_err(submission_error)?;

    let mut store = state.store.lock().await;
    let record = record_analysis(&mut store, payload)
        .await
        .map_err(submission_error)?;

    app_log!(
        info,
        "Analysis {} recorded for {} ({}%)",
        record.id,
        record.display_name,
        record.match_score
    );

    Ok(Json(DataResponse::success(
        format!("CV analysed for role '{}'", record.target_role),
        record,
    )))
}

async fn read_upload(upload: Form<AnalyzeForm<'_>>) -> Result<CvUpload, ApiError> {
    let form = upload.into_inner();

    let content_type = form.file.content_type();
    let raw_name_is_pdf = form
        .file
        .raw_name()
        .map(|name| {
            name.dangerous_unsafe_unsanitized_raw()
                .as_str()
                .to_lowercase()
                .ends_with(".pdf")
        })
        .unwrap_or(false);
    let is_pdf = raw_name_is_pdf || content_type.map_or(false, |ct| ct.is_pdf());

    // Sanitized stem, the extension is restored from what was sent
    let stem = form.file.name().unwrap_or("uploaded_cv");
    let file_name = if is_pdf {
        format!("{}.pdf", stem)
    } else {
        stem.to_string()
    };

    if form.file.len() > MAX_UPLOAD_BYTES {
        return Err(submission_error(SubmissionError::FileTooLarge {
            size: form.file.len(),
            max: MAX_UPLOAD_BYTES,
        }));
    }

    let mut content = Vec::with_capacity(form.file.len() as usize);
    let read = match form.file.open().await {
        Ok(reader) => {
            tokio::pin!(reader);
            reader.read_to_end(&mut content).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = read {
        app_log!(error, "Failed to read uploaded file: {}", e);
        return Err(StandardErrorResponse::new(
            "Failed to process uploaded file".to_string(),
            "FILE_READ_ERROR".to_string(),
            vec!["Try uploading the file again".to_string()],
        )
        .with_status(Status::BadRequest));
    }

    Ok(CvUpload {
        file_name,
        content,
        target_role: form.target_role.unwrap_or_default(),
    })
}

/// Validation problems are reported precisely, everything else gets one
/// generic message
pub fn submission_error(error: SubmissionError) -> ApiError {
    let (code, suggestions) = match &error {
        SubmissionError::MissingTargetRole => (
            "MISSING_TARGET_ROLE",
            vec!["Provide the job title you are applying for".to_string()],
        ),
        SubmissionError::UnsupportedFile(_) => (
            "INVALID_FORMAT",
            vec!["Upload a PDF file (.pdf)".to_string()],
        ),
        SubmissionError::EmptyFile => (
            "EMPTY_FILE",
            vec!["Check the file is not corrupted".to_string()],
        ),
        SubmissionError::FileTooLarge { .. } => (
            "FILE_TOO_LARGE",
            vec![
                "Compress your CV file".to_string(),
                "Use a smaller file size (max 10MB)".to_string(),
            ],
        ),
        SubmissionError::Failed(_) => {
            return StandardErrorResponse::new(
                "Analysis failed. Check that the analysis service is running.".to_string(),
                "ANALYSIS_FAILED".to_string(),
                vec![
                    "Try again in a few moments".to_string(),
                    "Ensure the CV has readable text".to_string(),
                ],
            )
            .with_status(Status::BadGateway);
        }
    };

    StandardErrorResponse::new(error.to_string(), code.to_string(), suggestions)
        .with_status(Status::BadRequest)
}
