use axum::Json;
use serde::Serialize;

use crate::editor::design::{Layout, Recommendation};
use crate::gallery::{SampleSummary, TemplateCard, SAMPLES, TEMPLATES};

#[derive(Serialize)]
pub struct TemplateListing {
    #[serde(flatten)]
    pub card: TemplateCard,
    pub layout: Layout,
    pub recommendation: Recommendation,
}

#[derive(Serialize)]
pub struct SampleListing {
    #[serde(flatten)]
    pub summary: SampleSummary,
    pub recommendation: Recommendation,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateListing>> {
    Json(
        TEMPLATES
            .iter()
            .map(|card| TemplateListing {
                card: card.clone(),
                layout: card.layout(),
                recommendation: card.recommendation(),
            })
            .collect(),
    )
}

/// GET /api/v1/samples
pub async fn handle_list_samples() -> Json<Vec<SampleListing>> {
    Json(
        SAMPLES
            .iter()
            .map(|sample| SampleListing {
                summary: sample.summary.clone(),
                recommendation: sample.recommendation(),
            })
            .collect(),
    )
}
