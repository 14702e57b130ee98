//! One editing session: document, design, the mounted preview and the external-call flag.
//!
//! The session is the single owner of editor state. Every content or design mutation goes
//! through a method here so that a mounted preview is re-rendered exactly once per change.
//! External calls never run while the session is borrowed: `begin_external` raises the
//! pending flag, the caller performs the I/O unlocked, and a `complete_*` method applies
//! the terminal result and clears the flag.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::collaborators::{CollaboratorError, UploadAnalysis};
use crate::editor::design::{DesignConfiguration, Layout, Recommendation};
use crate::editor::document::DocumentModel;
use crate::editor::ingest::IngestReport;
use crate::export::{self, ExportArtifact, ExportError};
use crate::models::resume::{Collection, EntryField, EntryId, ResumeDocument, ScalarField};
use crate::render::{render, VisualDocument};

pub const MIN_PREVIEW_SCALE: f32 = 0.1;
pub const MAX_PREVIEW_SCALE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalCall {
    Upload,
    Save,
    Suggestions,
    JobMatch,
}

impl ExternalCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalCall::Upload => "upload",
            ExternalCall::Save => "save",
            ExternalCall::Suggestions => "suggestions",
            ExternalCall::JobMatch => "job match",
        }
    }
}

impl fmt::Display for ExternalCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A {0} request is already in progress for this session")]
    Busy(ExternalCall),
}

/// Optional design changes applied together, with a single re-render.
#[derive(Debug, Clone, Default)]
pub struct DesignChange {
    pub template: Option<Layout>,
    pub color: Option<String>,
    pub font: Option<String>,
    pub spacing: Option<f32>,
    pub font_size: Option<u32>,
}

/// Read-only view of a session for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub document: ResumeDocument,
    pub design: DesignConfiguration,
    pub pending: Option<ExternalCall>,
    pub mounted: bool,
    pub revision: u64,
    pub render_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct EditorSession {
    id: Uuid,
    model: DocumentModel,
    design: DesignConfiguration,
    view: Option<VisualDocument>,
    pending: Option<ExternalCall>,
    /// Bumped on every change to document or design.
    revision: u64,
    render_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EditorSession {
    /// A fresh session holding the starter document and default design, not mounted.
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            model: DocumentModel::default(),
            design: DesignConfiguration::default(),
            view: None,
            pending: None,
            revision: 0,
            render_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document(&self) -> &ResumeDocument {
        self.model.document()
    }

    #[cfg(test)]
    pub fn design(&self) -> &DesignConfiguration {
        &self.design
    }

    pub fn view(&self) -> Option<&VisualDocument> {
        self.view.as_ref()
    }

    pub fn pending(&self) -> Option<ExternalCall> {
        self.pending
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[cfg(test)]
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            document: self.model.document().clone(),
            design: self.design.clone(),
            pending: self.pending,
            mounted: self.view.is_some(),
            revision: self.revision,
            render_count: self.render_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // ── Document ────────────────────────────────────────────────────────────

    pub fn set_field(&mut self, field: ScalarField, value: impl Into<String>) -> bool {
        let changed = self.model.set_field(field, value);
        self.commit(changed)
    }

    pub fn add_entry(&mut self, collection: Collection) -> EntryId {
        let id = self.model.add_entry(collection);
        self.commit(true);
        id
    }

    pub fn update_entry(
        &mut self,
        collection: Collection,
        id: EntryId,
        field: EntryField,
        value: impl Into<String>,
    ) -> bool {
        let changed = self.model.update_entry(collection, id, field, value);
        self.commit(changed)
    }

    pub fn remove_entry(&mut self, collection: Collection, id: EntryId) -> bool {
        let changed = self.model.remove_entry(collection, id);
        self.commit(changed)
    }

    pub fn add_skill(&mut self) -> usize {
        let index = self.model.add_skill();
        self.commit(true);
        index
    }

    pub fn replace_skill(&mut self, index: usize, value: impl Into<String>) -> bool {
        let changed = self.model.replace_skill(index, value);
        self.commit(changed)
    }

    pub fn remove_skill(&mut self, index: usize) -> bool {
        let changed = self.model.remove_skill(index);
        self.commit(changed)
    }

    /// Replaces the document wholesale. Always counts as a change.
    pub fn load_from(&mut self, data: &Value) -> IngestReport {
        let report = self.model.load_from(data);
        self.commit(true);
        report
    }

    // ── Design ──────────────────────────────────────────────────────────────

    pub fn update_design(&mut self, change: DesignChange) -> bool {
        let mut changed = false;
        if let Some(template) = change.template {
            changed |= self.design.set_template(template);
        }
        if let Some(color) = change.color {
            changed |= self.design.set_color(color);
        }
        if let Some(font) = change.font {
            changed |= self.design.set_font(font);
        }
        if let Some(spacing) = change.spacing {
            changed |= self.design.set_spacing(spacing);
        }
        if let Some(px) = change.font_size {
            changed |= self.design.set_font_size(px);
        }
        self.commit(changed)
    }

    pub fn apply_recommendation(&mut self, rec: &Recommendation) -> bool {
        let changed = self.design.apply_recommendation(rec);
        self.commit(changed)
    }

    pub fn reset_design(&mut self) -> bool {
        let changed = self.design.reset();
        self.commit(changed)
    }

    // ── Preview ─────────────────────────────────────────────────────────────

    /// Renders and attaches the preview at `scale`, clamped to the supported zoom range.
    pub fn mount(&mut self, scale: f32) -> &VisualDocument {
        let scale = if scale.is_finite() {
            scale.clamp(MIN_PREVIEW_SCALE, MAX_PREVIEW_SCALE)
        } else {
            1.0
        };
        let mut view = render(self.model.document(), &self.design);
        view.preview_scale = scale;
        self.render_count += 1;
        debug!(session_id = %self.id, scale, "Mounted preview");
        self.view.insert(view)
    }

    /// Detaches the preview. Returns false when nothing was mounted.
    pub fn unmount(&mut self) -> bool {
        self.view.take().is_some()
    }

    pub fn export(&self) -> Result<ExportArtifact, ExportError> {
        export::export(self.view.as_ref())
    }

    // ── External calls ──────────────────────────────────────────────────────

    /// Raises the pending flag. Only one external call may be outstanding per session.
    pub fn begin_external(&mut self, call: ExternalCall) -> Result<(), SessionError> {
        if let Some(current) = self.pending {
            return Err(SessionError::Busy(current));
        }
        self.pending = Some(call);
        debug!(session_id = %self.id, call = call.as_str(), "External call started");
        Ok(())
    }

    /// Terminal step of an upload: on success the parsed data replaces the document;
    /// on failure the document is untouched. The pending flag is cleared either way.
    pub fn complete_upload(
        &mut self,
        result: Result<UploadAnalysis, CollaboratorError>,
    ) -> Result<(UploadAnalysis, IngestReport), CollaboratorError> {
        self.complete_external();
        let analysis = result?;
        let report = self.load_from(&analysis.parsed_data);
        info!(
            session_id = %self.id,
            ats_score = ?analysis.ats_score,
            suggestions = analysis.suggestions.len(),
            "Loaded uploaded resume"
        );
        Ok((analysis, report))
    }

    /// Clears the pending flag after a call that does not change the document.
    pub fn complete_external(&mut self) {
        if let Some(call) = self.pending.take() {
            debug!(session_id = %self.id, call = call.as_str(), "External call finished");
        }
    }

    fn commit(&mut self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        self.revision += 1;
        self.updated_at = Utc::now();
        if let Some(current) = &self.view {
            let scale = current.preview_scale;
            let mut view = render(self.model.document(), &self.design);
            view.preview_scale = scale;
            self.view = Some(view);
            self.render_count += 1;
        }
        true
    }
}
