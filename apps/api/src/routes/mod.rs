pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::editor::handlers;
use crate::gallery::handlers as gallery;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        // Document
        .route("/api/v1/sessions/:id/fields", patch(handlers::handle_set_field))
        .route(
            "/api/v1/sessions/:id/entries/:collection",
            post(handlers::handle_add_entry),
        )
        .route(
            "/api/v1/sessions/:id/entries/:collection/:entry_id",
            patch(handlers::handle_update_entry).delete(handlers::handle_remove_entry),
        )
        .route("/api/v1/sessions/:id/skills", post(handlers::handle_add_skill))
        .route(
            "/api/v1/sessions/:id/skills/:index",
            put(handlers::handle_replace_skill).delete(handlers::handle_remove_skill),
        )
        .route("/api/v1/sessions/:id/load", post(handlers::handle_load))
        .route(
            "/api/v1/sessions/:id/samples/:sample_id",
            post(handlers::handle_load_sample),
        )
        // Design
        .route("/api/v1/sessions/:id/design", patch(handlers::handle_update_design))
        .route(
            "/api/v1/sessions/:id/design/reset",
            post(handlers::handle_reset_design),
        )
        .route(
            "/api/v1/sessions/:id/recommendation",
            post(handlers::handle_apply_recommendation),
        )
        .route(
            "/api/v1/sessions/:id/templates/:template_id",
            post(handlers::handle_choose_template),
        )
        // Preview & export
        .route(
            "/api/v1/sessions/:id/preview",
            post(handlers::handle_mount_preview)
                .get(handlers::handle_get_preview)
                .delete(handlers::handle_unmount_preview),
        )
        .route("/api/v1/sessions/:id/export", get(handlers::handle_export))
        // External collaborators
        .route("/api/v1/sessions/:id/upload", post(handlers::handle_upload))
        .route("/api/v1/sessions/:id/save", post(handlers::handle_save))
        .route(
            "/api/v1/sessions/:id/suggestions",
            post(handlers::handle_suggestions),
        )
        .route(
            "/api/v1/sessions/:id/job-match",
            post(handlers::handle_job_match),
        )
        // Gallery
        .route("/api/v1/templates", get(gallery::handle_list_templates))
        .route("/api/v1/samples", get(gallery::handle_list_samples))
        .with_state(state)
}
