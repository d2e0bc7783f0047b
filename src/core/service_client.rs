// src/core/service_client.rs
//! HTTP client for the remote CV analysis service

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use crate::types::RawAnalysisResponse;

const ANALYZE_CV_ENDPOINT: &str = "/analyze_cv";

const FILE_FIELD: &str = "file";
const TARGET_ROLE_FIELD: &str = "poste_vise";

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create new analysis client
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_CV_ENDPOINT)
    }

    /// Upload a CV and the target role, receive the raw analysis
    pub async fn analyze_cv(
        &self,
        file_content: Vec<u8>,
        file_name: &str,
        target_role: &str,
    ) -> Result<RawAnalysisResponse> {
        let url = self.endpoint();

        let form = Form::new()
            .part(
                FILE_FIELD,
                Part::bytes(file_content)
                    .file_name(file_name.to_string())
                    .mime_str("application/pdf")
                    .context("Failed to create multipart")?,
            )
            .text(TARGET_ROLE_FIELD, target_role.to_string());

        app_log!(info, "Calling CV analysis service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        app_log!(trace, "Response status: {}", status);

        if status.is_success() {
            let response_text = response
                .text()
                .await
                .context("Failed to read response text")?;

            app_log!(debug, "Raw analysis service response: {}", response_text);

            serde_json::from_str::<RawAnalysisResponse>(&response_text)
                .context("Failed to parse analysis service response")
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            app_log!(error, "Analysis service error response: {}", error_text);
            anyhow::bail!("Service returned error status {}: {}", status, error_text)
        }
    }
}
