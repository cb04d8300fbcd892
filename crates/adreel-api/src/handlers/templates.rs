//! Template picker data.

use axum::Json;

use adreel_models::Template;

/// `GET /api/templates`
pub async fn list_templates() -> Json<Vec<Template>> {
    Json(Template::presets())
}
