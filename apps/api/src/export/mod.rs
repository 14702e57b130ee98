// Export pipeline: mounted visual document → A4 PDF attachment.
// Stateless; the caller owns the mounted view.

pub mod pdf;

use thiserror::Error;

use crate::layout::{a4_portrait, compose};
use crate::render::VisualDocument;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("No preview is mounted; mount the preview before exporting")]
    NotReady,
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Content ran past the bottom margin and was clipped.
    pub overflowed: bool,
}

/// Snapshots the mounted view as a one-page A4 PDF.
///
/// The preview zoom is dropped first, so the bytes are the same at any preview scale.
pub fn export(view: Option<&VisualDocument>) -> Result<ExportArtifact, ExportError> {
    let view = view.ok_or(ExportError::NotReady)?;
    let snapshot = view.unscaled();
    let layout = compose(&snapshot, &a4_portrait());

    if layout.overflowed {
        tracing::warn!(
            name = %snapshot.header.name,
            "Resume overflows one page; export clipped at the bottom margin"
        );
    }

    let bytes = pdf::write_pdf(&layout, &snapshot.header.name);
    tracing::info!(bytes = bytes.len(), layout = snapshot.layout.as_str(), "Exported resume PDF");

    Ok(ExportArtifact {
        filename: export_filename(&snapshot.header.name),
        bytes,
        overflowed: layout.overflowed,
    })
}

/// `{name}_Resume.pdf`, with each run of non-alphanumeric characters collapsed to `_`.
pub fn export_filename(full_name: &str) -> String {
    let mut stem = String::with_capacity(full_name.len());
    for c in full_name.chars() {
        if c.is_alphanumeric() {
            stem.push(c);
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    let stem = stem.trim_matches('_');
    let stem = if stem.is_empty() { "Resume" } else { stem };
    format!("{stem}_Resume.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::design::DesignConfiguration;
    use crate::models::resume::ResumeDocument;
    use crate::render::render;

    #[test]
    fn test_export_without_view_is_not_ready() {
        assert_eq!(export(None).unwrap_err(), ExportError::NotReady);
    }

    #[test]
    fn test_export_filename_sanitizes_name() {
        assert_eq!(export_filename("John Doe"), "John_Doe_Resume.pdf");
        assert_eq!(export_filename("  Mary-Jane  O'Neil "), "Mary_Jane_O_Neil_Resume.pdf");
        assert_eq!(export_filename("José Núñez"), "José_Núñez_Resume.pdf");
        assert_eq!(export_filename(""), "Resume_Resume.pdf");
        assert_eq!(export_filename("***"), "Resume_Resume.pdf");
    }

    #[test]
    fn test_export_is_independent_of_preview_scale() {
        let mut view = render(&ResumeDocument::starter(), &DesignConfiguration::default());
        let at_full = export(Some(&view)).unwrap();
        view.preview_scale = 0.6;
        let at_zoom = export(Some(&view)).unwrap();

        assert_eq!(at_full.bytes, at_zoom.bytes);
        assert_eq!(at_full.filename, "John_Doe_Resume.pdf");
        assert!(!at_full.overflowed);
    }

    #[test]
    fn test_export_is_idempotent() {
        let view = render(&ResumeDocument::starter(), &DesignConfiguration::default());
        let a = export(Some(&view)).unwrap();
        let b = export(Some(&view)).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }
}
