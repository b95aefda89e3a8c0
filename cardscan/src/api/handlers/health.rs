use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::vision::ExtractorInfo;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub extractor: ExtractorInfo,
}

/// `GET /api/health`
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let extractor = state.cards.extractor_info();

    Json(HealthData {
        status: (if extractor.available { "ok" } else { "degraded" }).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        extractor,
    })
}
