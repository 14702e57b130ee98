use std::sync::Arc;

use crate::collaborators::{JobMatcher, ResumeParser, ResumeStore, SuggestionSource};
use crate::config::Config;
use crate::editor::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub config: Config,
    /// Upload parse + ATS analysis. Default: `CollaboratorClient` over HTTP.
    pub parser: Arc<dyn ResumeParser>,
    pub store: Arc<dyn ResumeStore>,
    pub suggestions: Arc<dyn SuggestionSource>,
    pub job_matcher: Arc<dyn JobMatcher>,
}
