use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::utils::OUTPUT_MIME;

use super::{Analyzer, AnalyzerConfig};

/// Text merged into an item when analysis could not be performed.
pub const ANALYSIS_FALLBACK: &str = "AI analysis unavailable.";

/// Internal analyzer failures. Never surfaced past [`VisionAnalyzer::analyze`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {0}: {1}")]
    Status(u16, String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Analyzer backed by a `generateContent` vision endpoint.
pub struct VisionAnalyzer {
    client: Client,
    config: AnalyzerConfig,
}

impl VisionAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// One request, no retries.
    pub async fn try_analyze(&self, image: &[u8]) -> Result<String, AnalysisError> {
        let key = self.config.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        debug!("Requesting analysis of {} bytes from {}", image.len(), self.config.model);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key)
            .json(&request_body(image, &self.config.prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status(status.as_u16(), detail));
        }

        let value: Value = response.json().await?;
        extract_text(&value)
    }
}

#[async_trait]
impl Analyzer for VisionAnalyzer {
    async fn analyze(&self, image: &[u8]) -> String {
        match self.try_analyze(image).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Image analysis failed: {e}");
                ANALYSIS_FALLBACK.to_string()
            }
        }
    }
}

/// Request payload: the image inline as base64, followed by the prompt.
pub fn request_body(image: &[u8], prompt: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                {
                    "inlineData": {
                        "mimeType": OUTPUT_MIME,
                        "data": general_purpose::STANDARD.encode(image),
                    }
                },
                { "text": prompt }
            ]
        }]
    })
}

/// Concatenated text parts of the first candidate.
pub fn extract_text(response: &Value) -> Result<String, AnalysisError> {
    let parts = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| AnalysisError::MalformedResponse("no candidate parts".to_string()))?;

    let text = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(AnalysisError::MalformedResponse("candidate has no text".to_string()));
    }
    Ok(text)
}
