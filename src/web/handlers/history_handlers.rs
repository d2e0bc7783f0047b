// src/web/handlers/history_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use crate::types::AnalysisRecord;
use crate::web::types::{
    ActionResponse, ApiError, AppState, DataResponse, HistoryEntry, StandardErrorResponse,
};

pub async fn list_history_handler(state: &State<AppState>) -> Json<DataResponse<Vec<HistoryEntry>>> {
    let store = state.store.lock().await;
    let entries: Vec<HistoryEntry> = store.list().iter().map(HistoryEntry::from).collect();

    Json(DataResponse::success(
        format!("{} analysis(es) in history", entries.len()),
        entries,
    ))
}

pub async fn get_history_entry_handler(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<AnalysisRecord>>, ApiError> {
    let store = state.store.lock().await;

    match store.get(id) {
        Some(record) => Ok(Json(DataResponse::success(
            format!("Analysis for {}", record.display_name),
            record.clone(),
        ))),
        None => Err(StandardErrorResponse::new(
            format!("Analysis not found: {}", id),
            "NOT_FOUND".to_string(),
            vec!["List the history to get valid analysis ids".to_string()],
        )
        .with_status(Status::NotFound)),
    }
}

pub async fn delete_history_entry_handler(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    let mut store = state.store.lock().await;

    if let Err(e) = store.delete(id).await {
        app_log!(error, "Failed to delete analysis {}: {:#}", id, e);
        return Err(storage_error());
    }

    Ok(Json(ActionResponse::success(
        format!("Analysis {} removed", id),
        "deleted".to_string(),
    )))
}

pub async fn clear_history_handler(state: &State<AppState>) -> Result<Json<ActionResponse>, ApiError> {
    let mut store = state.store.lock().await;

    if let Err(e) = store.clear().await {
        app_log!(error, "Failed to clear history: {:#}", e);
        return Err(storage_error());
    }

    Ok(Json(ActionResponse::success(
        "History cleared".to_string(),
        "cleared".to_string(),
    )))
}

fn storage_error() -> ApiError {
    StandardErrorResponse::new(
        "History storage is unavailable".to_string(),
        "STORAGE_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    )
    .with_status(Status::InternalServerError)
}
