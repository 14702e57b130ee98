// Template renderer: (ResumeDocument × DesignConfiguration) → VisualDocument.
// Pure and total; re-run synchronously after every editor mutation.

pub mod templates;
pub mod visual;

pub use templates::render;
pub use visual::VisualDocument;
