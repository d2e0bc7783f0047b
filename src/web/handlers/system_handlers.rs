// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::web::types::{AppState, TextResponse};

pub async fn health_handler(state: &State<AppState>) -> Json<TextResponse> {
    let records = state.store.lock().await.len();
    info!("Health check ({} analyses in history)", records);
    Json(TextResponse::success("OK".to_string()))
}
