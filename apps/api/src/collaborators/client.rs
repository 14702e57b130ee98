/// HTTP client for the resume services (parse/score, persistence, suggestions, job match).
///
/// One `reqwest::Client` shared by every collaborator trait. No retries: a failed
/// call is reported to the user, who decides whether to try again.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{
    check_upload_filename, suggestions_from_value, CollaboratorError, JobMatch, JobMatcher,
    ResumeParser, ResumeStore, SaveOutcome, Suggestion, SuggestionSource, UploadAnalysis,
};
use crate::models::resume::ResumeDocument;

const UPLOAD_PATH: &str = "/api/upload-optimize";
const SAVE_PATH: &str = "/api/resumes/save";
const SUGGEST_PATH: &str = "/api/analyze-content";
const JOB_MATCH_PATH: &str = "/api/job-match";

#[derive(Clone)]
pub struct CollaboratorClient {
    client: Client,
    base_url: String,
}

impl CollaboratorClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build collaborator HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the JSON body of a 2xx response, or the service's error message.
    async fn json_body(response: Response) -> Result<Value, CollaboratorError> {
        let status = response.status();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        let message = error_message(&body).unwrap_or_else(|| {
            if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text.chars().take(200).collect()
            }
        });
        warn!(status = status.as_u16(), %message, "Collaborator call failed");
        Err(CollaboratorError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// `{"message": ...}`, FastAPI's `{"detail": ...}` or `{"error": ...}`.
fn error_message(body: &Value) -> Option<String> {
    ["message", "detail", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[async_trait]
impl ResumeParser for CollaboratorClient {
    async fn analyze(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadAnalysis, CollaboratorError> {
        check_upload_filename(filename)?;
        debug!(filename, size = bytes.len(), "Sending resume for analysis");

        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;

        let body = Self::json_body(response).await?;
        Ok(UploadAnalysis {
            ats_score: body.get("atsScore").and_then(|v| v.as_f64()),
            suggestions: suggestions_from_value(&body),
            parsed_data: body.get("parsedData").cloned().unwrap_or(Value::Null),
        })
    }
}

#[async_trait]
impl ResumeStore for CollaboratorClient {
    async fn save(
        &self,
        user_id: &str,
        document: &ResumeDocument,
    ) -> Result<SaveOutcome, CollaboratorError> {
        let mut payload = serde_json::to_value(document).unwrap_or_else(|_| json!({}));
        if let Some(map) = payload.as_object_mut() {
            map.insert("user_id".to_string(), Value::String(user_id.to_string()));
        }

        let response = self
            .client
            .post(self.url(SAVE_PATH))
            .json(&payload)
            .send()
            .await?;
        let body = Self::json_body(response).await?;

        Ok(SaveOutcome {
            success: body.get("success").and_then(|v| v.as_bool()).unwrap_or(true),
            message: error_message(&body),
        })
    }
}

#[async_trait]
impl SuggestionSource for CollaboratorClient {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, CollaboratorError> {
        let response = self
            .client
            .post(self.url(SUGGEST_PATH))
            .json(&json!({ "text": text }))
            .send()
            .await?;
        let body = Self::json_body(response).await?;
        Ok(suggestions_from_value(&body))
    }
}

#[async_trait]
impl JobMatcher for CollaboratorClient {
    async fn match_job(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<JobMatch, CollaboratorError> {
        let form = multipart::Form::new()
            .text("job_description", job_description.to_string())
            .text("resume_text", resume_text.to_string());
        let response = self
            .client
            .post(self.url(JOB_MATCH_PATH))
            .multipart(form)
            .send()
            .await?;
        let body = Self::json_body(response).await?;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CollaboratorClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(SAVE_PATH), "http://localhost:8000/api/resumes/save");
    }

    #[test]
    fn test_error_message_prefers_message_then_detail() {
        assert_eq!(
            error_message(&json!({"message": "Could not extract text"})),
            Some("Could not extract text".to_string())
        );
        assert_eq!(error_message(&json!({"detail": "Not Found"})), Some("Not Found".to_string()));
        assert_eq!(error_message(&json!({"status": "ok"})), None);
    }

    #[tokio::test]
    async fn test_unsupported_upload_rejected_before_network() {
        // Port 9 is never contacted: the extension check fails first.
        let client = CollaboratorClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        let err = client.analyze("resume.png", vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::UnsupportedFile(_)));
    }
}
