// External collaborators: resume parsing, persistence, content suggestions, job matching.
// The editor only sees these traits; `CollaboratorClient` is the HTTP implementation.
// Calls run outside the session lock (see editor::session).

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::resume::ResumeDocument;

pub use client::CollaboratorClient;

/// Upload formats the parse service accepts.
pub const SUPPORTED_UPLOAD_EXTENSIONS: [&str; 3] = ["pdf", "docx", "doc"];

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Collaborator returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unsupported file type '{0}'; upload a PDF or Word document")]
    UnsupportedFile(String),
}

/// One piece of feedback from the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub id: u32,
    /// `success`, `warning`, `error` or `info`.
    #[serde(rename = "type", default = "default_suggestion_kind")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

fn default_suggestion_kind() -> String {
    "info".to_string()
}

/// Result of the upload-parse call. `parsed_data` is raw and goes through ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAnalysis {
    #[serde(default)]
    pub ats_score: Option<f64>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub parsed_data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// How well the resume fits a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    /// 0 to 100.
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[async_trait]
pub trait ResumeParser: Send + Sync {
    async fn analyze(&self, filename: &str, bytes: Vec<u8>)
        -> Result<UploadAnalysis, CollaboratorError>;
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn save(
        &self,
        user_id: &str,
        document: &ResumeDocument,
    ) -> Result<SaveOutcome, CollaboratorError>;
}

#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, CollaboratorError>;
}

#[async_trait]
pub trait JobMatcher: Send + Sync {
    async fn match_job(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<JobMatch, CollaboratorError>;
}

/// Rejects anything but PDF and Word uploads before a network round trip.
pub fn check_upload_filename(filename: &str) -> Result<(), CollaboratorError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if SUPPORTED_UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(CollaboratorError::UnsupportedFile(filename.to_string()))
    }
}

/// Reads a `suggestions` array that may hold either plain strings or suggestion objects.
pub fn suggestions_from_value(value: &Value) -> Vec<Suggestion> {
    value
        .get("suggestions")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| match item {
                    Value::String(text) => Some(Suggestion {
                        id: i as u32 + 1,
                        kind: default_suggestion_kind(),
                        title: String::new(),
                        description: text.clone(),
                    }),
                    Value::Object(_) => serde_json::from_value(item.clone()).ok(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_match_tolerates_missing_fields() {
        let parsed: JobMatch =
            serde_json::from_value(json!({"matchScore": 64, "missingKeywords": ["Kubernetes"]}))
                .unwrap();
        assert_eq!(parsed.match_score, 64.0);
        assert_eq!(parsed.missing_keywords, vec!["Kubernetes".to_string()]);
        assert!(parsed.summary.is_empty());
        assert!(parsed.recommendations.is_empty());
    }

    #[test]
    fn test_upload_filename_check() {
        assert!(check_upload_filename("cv.pdf").is_ok());
        assert!(check_upload_filename("CV.DOCX").is_ok());
        assert!(check_upload_filename("old.doc").is_ok());
        assert!(matches!(
            check_upload_filename("photo.png"),
            Err(CollaboratorError::UnsupportedFile(_))
        ));
        assert!(check_upload_filename("no_extension").is_err());
    }

    #[test]
    fn test_suggestions_accept_strings_and_objects() {
        let value = json!({
            "suggestions": [
                "Quantify your impact",
                {"id": 7, "type": "warning", "title": "Short", "description": "Add more"},
                42
            ]
        });
        let suggestions = suggestions_from_value(&value);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].description, "Quantify your impact");
        assert_eq!(suggestions[0].kind, "info");
        assert_eq!(suggestions[1].id, 7);
        assert_eq!(suggestions[1].kind, "warning");
    }

    #[test]
    fn test_suggestions_missing_array_is_empty() {
        assert!(suggestions_from_value(&json!({"message": "x"})).is_empty());
    }

    #[test]
    fn test_upload_analysis_tolerates_missing_fields() {
        let analysis: UploadAnalysis = serde_json::from_value(json!({"atsScore": 72})).unwrap();
        assert_eq!(analysis.ats_score, Some(72.0));
        assert!(analysis.suggestions.is_empty());
        assert!(analysis.parsed_data.is_null());
    }
}
