use std::future::Future;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::collaborators::{
    check_upload_filename, CollaboratorError, JobMatch, SaveOutcome, Suggestion,
};
use crate::editor::design::{Layout, Recommendation};
use crate::editor::ingest::IngestReport;
use crate::editor::session::{DesignChange, ExternalCall, SessionSnapshot};
use crate::editor::store::SharedSession;
use crate::errors::AppError;
use crate::gallery::{find_sample, find_template};
use crate::models::resume::{Collection, EntryField, EntryId, ScalarField};
use crate::render::VisualDocument;
use crate::state::AppState;

/// Spacing range offered by the editor's slider.
const SPACING_RANGE: (f32, f32) = (1.0, 2.0);
const FONT_SIZE_RANGE: (u32, u32) = (8, 32);

#[derive(Serialize)]
pub struct MutationResponse {
    pub changed: bool,
    pub revision: u64,
}

#[derive(Serialize)]
pub struct EntryCreated {
    pub id: EntryId,
    pub revision: u64,
}

#[derive(Serialize)]
pub struct SkillCreated {
    pub index: usize,
    pub revision: u64,
}

#[derive(Serialize)]
pub struct LoadResponse {
    pub revision: u64,
    pub report: IngestReport,
}

#[derive(Deserialize)]
pub struct FieldUpdate {
    pub field: ScalarField,
    pub value: String,
}

#[derive(Deserialize)]
pub struct EntryUpdate {
    pub field: EntryField,
    pub value: String,
}

#[derive(Deserialize)]
pub struct SkillUpdate {
    pub value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignPatch {
    pub template: Option<Layout>,
    pub color: Option<String>,
    pub font: Option<String>,
    pub spacing: Option<f32>,
    pub font_size: Option<u32>,
}

impl DesignPatch {
    /// Keeps numeric inputs inside the ranges the editing controls allow.
    fn into_change(self) -> Result<DesignChange, AppError> {
        let spacing = match self.spacing {
            Some(s) if !s.is_finite() => {
                return Err(AppError::Validation("spacing must be a number".to_string()))
            }
            Some(s) => Some(s.clamp(SPACING_RANGE.0, SPACING_RANGE.1)),
            None => None,
        };
        Ok(DesignChange {
            template: self.template,
            color: self.color,
            font: self.font,
            spacing,
            font_size: self
                .font_size
                .map(|px| px.clamp(FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1)),
        })
    }
}

#[derive(Deserialize)]
pub struct MountRequest {
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub ats_score: Option<f64>,
    pub suggestions: Vec<Suggestion>,
    pub report: IngestReport,
    pub revision: u64,
}

#[derive(Deserialize)]
pub struct SaveRequest {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Deserialize)]
pub struct JobMatchRequest {
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let session = state.sessions.create().await?;
    let snapshot = session.lock().await.snapshot();
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(id).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/sessions/:id/fields
pub async fn handle_set_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<MutationResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let changed = session.set_field(req.field, req.value);
    Ok(Json(MutationResponse {
        changed,
        revision: session.revision(),
    }))
}

/// POST /api/v1/sessions/:id/entries/:collection
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((id, collection)): Path<(Uuid, Collection)>,
) -> Result<(StatusCode, Json<EntryCreated>), AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let entry_id = session.add_entry(collection);
    Ok((
        StatusCode::CREATED,
        Json(EntryCreated {
            id: entry_id,
            revision: session.revision(),
        }),
    ))
}

/// PATCH /api/v1/sessions/:id/entries/:collection/:entry_id
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((id, collection, entry_id)): Path<(Uuid, Collection, EntryId)>,
    Json(req): Json<EntryUpdate>,
) -> Result<Json<MutationResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let changed = session.update_entry(collection, entry_id, req.field, req.value);
    Ok(Json(MutationResponse {
        changed,
        revision: session.revision(),
    }))
}

/// DELETE /api/v1/sessions/:id/entries/:collection/:entry_id
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, collection, entry_id)): Path<(Uuid, Collection, EntryId)>,
) -> Result<Json<MutationResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let changed = session.remove_entry(collection, entry_id);
    Ok(Json(MutationResponse {
        changed,
        revision: session.revision(),
    }))
}

/// POST /api/v1/sessions/:id/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SkillCreated>), AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let index = session.add_skill();
    Ok((
        StatusCode::CREATED,
        Json(SkillCreated {
            index,
            revision: session.revision(),
        }),
    ))
}

/// PUT /api/v1/sessions/:id/skills/:index
pub async fn handle_replace_skill(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<SkillUpdate>,
) -> Result<Json<MutationResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let changed = session.replace_skill(index, req.value);
    Ok(Json(MutationResponse {
        changed,
        revision: session.revision(),
    }))
}

/// DELETE /api/v1/sessions/:id/skills/:index
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<MutationResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let changed = session.remove_skill(index);
    Ok(Json(MutationResponse {
        changed,
        revision: session.revision(),
    }))
}

/// POST /api/v1/sessions/:id/load
///
/// Accepts any JSON; ingestion normalizes whatever arrives.
pub async fn handle_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<Value>,
) -> Result<Json<LoadResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let report = session.load_from(&data);
    Ok(Json(LoadResponse {
        revision: session.revision(),
        report,
    }))
}

/// POST /api/v1/sessions/:id/samples/:sample_id
///
/// Loads a gallery sample and applies its recommended layout and color.
pub async fn handle_load_sample(
    State(state): State<AppState>,
    Path((id, sample_id)): Path<(Uuid, String)>,
) -> Result<Json<LoadResponse>, AppError> {
    let sample = find_sample(&sample_id)
        .ok_or_else(|| AppError::NotFound(format!("Sample '{sample_id}' not found")))?;
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let report = session.load_from(&(sample.data)());
    session.apply_recommendation(&sample.recommendation());
    Ok(Json(LoadResponse {
        revision: session.revision(),
        report,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Design
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/sessions/:id/design
pub async fn handle_update_design(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DesignPatch>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let change = patch.into_change()?;
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.update_design(change);
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/design/reset
pub async fn handle_reset_design(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.reset_design();
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/recommendation
pub async fn handle_apply_recommendation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(rec): Json<Recommendation>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.apply_recommendation(&rec);
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/templates/:template_id
///
/// Picks a gallery template card: its layout and color are applied as a recommendation.
pub async fn handle_choose_template(
    State(state): State<AppState>,
    Path((id, template_id)): Path<(Uuid, String)>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let card = find_template(&template_id)
        .ok_or_else(|| AppError::NotFound(format!("Template '{template_id}' not found")))?;
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.apply_recommendation(&card.recommendation());
    Ok(Json(session.snapshot()))
}

// ────────────────────────────────────────────────────────────────────────────
// Preview & export
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/preview
pub async fn handle_mount_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    req: Option<Json<MountRequest>>,
) -> Result<Json<VisualDocument>, AppError> {
    let scale = req.map_or_else(default_scale, |Json(r)| r.scale);
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let view = session.mount(scale).clone();
    Ok(Json(view))
}

/// GET /api/v1/sessions/:id/preview
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VisualDocument>, AppError> {
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;
    session
        .view()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::Conflict("No preview is mounted for this session".to_string()))
}

/// DELETE /api/v1/sessions/:id/preview
pub async fn handle_unmount_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = state.sessions.get(id).await?;
    if session.lock().await.unmount() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Conflict("No preview is mounted for this session".to_string()))
    }
}

/// GET /api/v1/sessions/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.sessions.get(id).await?;
    let artifact = session.lock().await.export()?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", artifact.filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if artifact.overflowed {
        headers.insert("x-content-overflow", HeaderValue::from_static("clipped"));
    }

    Ok((headers, Bytes::from(artifact.bytes)))
}

// ────────────────────────────────────────────────────────────────────────────
// External collaborators
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/upload
///
/// Multipart field `file`. On success the parsed resume replaces the document.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (filename, bytes) = read_upload(&mut multipart).await?;
    check_upload_filename(&filename)?;

    let session = state.sessions.get(id).await?;
    session.lock().await.begin_external(ExternalCall::Upload)?;

    // Runs detached so the terminal step happens even if the client goes away.
    let parser = state.parser.clone();
    let task_session = session.clone();
    let task = tokio::spawn(async move {
        let result = parser.analyze(&filename, bytes).await;
        let mut session = task_session.lock().await;
        let outcome = session.complete_upload(result);
        (outcome, session.revision())
    });

    let (outcome, revision) = task.await.map_err(|e| AppError::Internal(e.into()))?;
    let (analysis, report) = outcome?;
    Ok(Json(UploadResponse {
        ats_score: analysis.ats_score,
        suggestions: analysis.suggestions,
        report,
        revision,
    }))
}

/// POST /api/v1/sessions/:id/save
pub async fn handle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveOutcome>, AppError> {
    if req.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id is required".to_string()));
    }
    let session = state.sessions.get(id).await?;
    let document = {
        let mut s = session.lock().await;
        s.begin_external(ExternalCall::Save)?;
        s.document().clone()
    };

    let store = state.store.clone();
    let outcome = run_detached(session, async move { store.save(&req.user_id, &document).await })
        .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/sessions/:id/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let text = {
        let mut s = session.lock().await;
        s.begin_external(ExternalCall::Suggestions)?;
        s.document().to_plain_text()
    };

    let source = state.suggestions.clone();
    let suggestions = run_detached(session, async move { source.suggest(&text).await }).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}

/// POST /api/v1/sessions/:id/job-match
///
/// Compares the session's resume text with a pasted job description.
pub async fn handle_job_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<JobMatchRequest>,
) -> Result<Json<JobMatch>, AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }
    let session = state.sessions.get(id).await?;
    let resume_text = {
        let mut s = session.lock().await;
        s.begin_external(ExternalCall::JobMatch)?;
        s.document().to_plain_text()
    };

    let matcher = state.job_matcher.clone();
    let result = run_detached(session, async move {
        matcher.match_job(&req.job_description, &resume_text).await
    })
    .await?;
    Ok(Json(result))
}

/// Runs a document-neutral external call on its own task and clears the pending flag
/// when it finishes.
async fn run_detached<T, F>(session: SharedSession, call: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, CollaboratorError>> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let result = call.await;
        session.lock().await.complete_external();
        result
    });
    let result = task.await.map_err(|e| AppError::Internal(e.into()))?;
    Ok(result?)
}

async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(AppError::Validation("Multipart field 'file' is required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_patch_clamps_ranges() {
        let change = DesignPatch {
            spacing: Some(3.5),
            font_size: Some(2),
            ..DesignPatch::default()
        }
        .into_change()
        .unwrap();
        assert_eq!(change.spacing, Some(2.0));
        assert_eq!(change.font_size, Some(8));
    }

    #[test]
    fn test_design_patch_rejects_nan_spacing() {
        let patch = DesignPatch {
            spacing: Some(f32::NAN),
            ..DesignPatch::default()
        };
        assert!(matches!(patch.into_change(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_design_patch_accepts_gallery_free_text() {
        let patch: DesignPatch =
            serde_json::from_str(r##"{"color": "rebeccapurple", "fontSize": 16}"##).unwrap();
        let change = patch.into_change().unwrap();
        assert_eq!(change.color.as_deref(), Some("rebeccapurple"));
        assert_eq!(change.font_size, Some(16));
        assert!(change.template.is_none());
    }
}
