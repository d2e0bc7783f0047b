// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

use crate::types::AnalysisRecord;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/analyze", data = "<upload>")]
pub async fn analyze(
    upload: Form<AnalyzeForm<'_>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<AnalysisRecord>>, ApiError> {
    handlers::analyze_handler(upload, state).await
}

#[get("/history")]
pub async fn list_history(state: &State<AppState>) -> Json<DataResponse<Vec<HistoryEntry>>> {
    handlers::list_history_handler(state).await
}

#[get("/history/<id>")]
pub async fn get_history_entry(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<AnalysisRecord>>, ApiError> {
    handlers::get_history_entry_handler(id, state).await
}

#[delete("/history/<id>")]
pub async fn delete_history_entry(
    id: &str,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::delete_history_entry_handler(id, state).await
}

#[delete("/history")]
pub async fn clear_history(state: &State<AppState>) -> Result<Json<ActionResponse>, ApiError> {
    handlers::clear_history_handler(state).await
}

#[get("/health")]
pub async fn health(state: &State<AppState>) -> Json<TextResponse> {
    handlers::health_handler(state).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Send the CV as multipart/form-data with a 'file' field".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request could not be processed".to_string(),
        "UNPROCESSABLE".to_string(),
        vec![
            "Verify all required fields are present".to_string(),
            "PDF files are limited to 10MB".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the server without launching it
pub fn build_rocket(state: AppState, port: u16) -> Rocket<Build> {
    let limits = Limits::default()
        .limit("file", 10.mebibytes())
        .limit("data-form", 11.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                analyze,
                list_history,
                get_history_entry,
                delete_history_entry,
                clear_history,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(state: AppState, port: u16) -> Result<()> {
    info!("Starting Career Compass API server on port {}", port);

    let _rocket = build_rocket(state, port).launch().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisClient, MemoryStorage};
    use crate::history::HistoryStore;
    use crate::test_support::{one_shot_server, sample_payload};
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use std::sync::Arc;

    async fn client_with(names: &[&str]) -> (Client, Vec<String>) {
        let mut store = HistoryStore::init(Arc::new(MemoryStorage::new())).await;
        let mut ids = Vec::new();
        for (i, name) in names.iter().enumerate() {
            ids.push(store.save(sample_payload(name, 30 + i as u8 * 30)).await.unwrap());
        }

        // Nothing listens there: any submission that passes validation fails
        let analysis = AnalysisClient::new("http://127.0.0.1:9", 1).unwrap();
        let rocket = build_rocket(AppState::new(analysis, store), 0);
        (Client::tracked(rocket).await.unwrap(), ids)
    }

    fn json(body: &str) -> serde_json::Value {
        serde_json::from_str(body).unwrap()
    }

    #[rocket::async_test]
    async fn test_list_history_newest_first() {
        let (client, ids) = client_with(&["Old", "New"]).await;

        let response = client.get("/api/history").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = json(&response.into_string().await.unwrap());

        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], ids[1].as_str());
        assert_eq!(data[0]["displayName"], "New");
        assert_eq!(data[0]["scoreBand"], "medium");
        assert_eq!(data[1]["scoreBand"], "low");
    }

    #[rocket::async_test]
    async fn test_get_and_delete_entry() {
        let (client, ids) = client_with(&["Only"]).await;
        let path = format!("/api/history/{}", ids[0]);

        let response = client.get(path.as_str()).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = json(&response.into_string().await.unwrap());
        assert_eq!(body["data"]["payload"]["profile"]["name"], "Only");

        for _ in 0..2 {
            let response = client.delete(path.as_str()).dispatch().await;
            assert_eq!(response.status(), Status::Ok);
        }

        let response = client.get(path.as_str()).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body = json(&response.into_string().await.unwrap());
        assert_eq!(body["error_code"], "NOT_FOUND");
    }

    #[rocket::async_test]
    async fn test_clear_history() {
        let (client, _) = client_with(&["A", "B"]).await;

        let response = client.delete("/api/history").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let response = client.get("/api/history").dispatch().await;
        let body = json(&response.into_string().await.unwrap());
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    fn multipart(file_name: &str, target_role: Option<&str>) -> (ContentType, String) {
        let boundary = "X-CAREER-COMPASS-BOUNDARY";
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: application/pdf\r\n\r\n%PDF-1.4 test\r\n",
            b = boundary,
            f = file_name
        );
        if let Some(role) = target_role {
            body.push_str(&format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"target_role\"\r\n\r\n{r}\r\n",
                b = boundary,
                r = role
            ));
        }
        body.push_str(&format!("--{}--\r\n", boundary));

        let content_type =
            ContentType::new("multipart", "form-data").with_params(("boundary", boundary));
        (content_type, body)
    }

    #[rocket::async_test]
    async fn test_analyze_requires_target_role() {
        let (client, _) = client_with(&[]).await;
        let (content_type, body) = multipart("cv.pdf", None);

        let response = client
            .post("/api/analyze")
            .header(content_type)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body = json(&response.into_string().await.unwrap());
        assert_eq!(body["error_code"], "MISSING_TARGET_ROLE");
    }

    #[rocket::async_test]
    async fn test_analyze_service_failure_is_generic() {
        let (client, _) = client_with(&[]).await;
        let (content_type, body) = multipart("cv.pdf", Some("Data Analyst"));

        let response = client
            .post("/api/analyze")
            .header(content_type)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadGateway);
        let body = json(&response.into_string().await.unwrap());
        assert_eq!(body["error_code"], "ANALYSIS_FAILED");

        let response = client.get("/api/history").dispatch().await;
        let body = json(&response.into_string().await.unwrap());
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn test_analyze_records_service_reply() {
        let reply = r#"{"name": "Salma", "score_match": "81", "missing_skills": ["Rust"]}"#;
        let (base_url, _server) = one_shot_server("200 OK", reply).await;
        let store = HistoryStore::init(Arc::new(MemoryStorage::new())).await;
        let analysis = AnalysisClient::new(base_url, 5).unwrap();
        let client = Client::tracked(build_rocket(AppState::new(analysis, store), 0))
            .await
            .unwrap();
        let (content_type, body) = multipart("cv.pdf", Some("Backend Developer"));

        let response = client
            .post("/api/analyze")
            .header(content_type)
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body = json(&response.into_string().await.unwrap());
        assert_eq!(body["data"]["displayName"], "Salma");
        assert_eq!(body["data"]["matchScore"], 81);
        assert_eq!(body["data"]["payload"]["missingSkills"][0]["priority"], "high");

        let response = client.get("/api/history").dispatch().await;
        let history = json(&response.into_string().await.unwrap());
        assert_eq!(history["data"][0]["id"], body["data"]["id"]);
    }

    #[rocket::async_test]
    async fn test_health() {
        let (client, _) = client_with(&[]).await;
        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert!(response.headers().contains("Access-Control-Allow-Origin"));
    }
}
