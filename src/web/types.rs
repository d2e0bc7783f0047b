// src/web/types.rs

use chrono::{DateTime, Utc};
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use tokio::sync::Mutex;

use crate::core::AnalysisClient;
use crate::history::HistoryStore;
use crate::report::ScoreBand;
use crate::types::AnalysisRecord;

/// Shared server state. The mutex serializes every read-modify-write of the
/// history log between concurrent requests.
pub struct AppState {
    pub client: AnalysisClient,
    pub store: Mutex<HistoryStore>,
}

impl AppState {
    pub fn new(client: AnalysisClient, store: HistoryStore) -> Self {
        Self {
            client,
            store: Mutex::new(store),
        }
    }
}

#[derive(FromForm)]
pub struct AnalyzeForm<'f> {
    pub file: TempFile<'f>,
    pub target_role: Option<String>,
}

/// History list row
#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub display_name: String,
    pub target_role: String,
    pub match_score: u8,
    pub score_band: ScoreBand,
}

impl From<&AnalysisRecord> for HistoryEntry {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            id: record.id.clone(),
            created_at: record.created_at,
            display_name: record.display_name.clone(),
            target_role: record.target_role.clone(),
            match_score: record.match_score,
            score_band: ScoreBand::from_score(record.match_score),
        }
    }
}

// ===== Standard response types =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

/// Error body with its HTTP status
pub type ApiError = (Status, Json<StandardErrorResponse>);

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }

    pub fn with_status(self, status: Status) -> ApiError {
        (status, Json(self))
    }
}
