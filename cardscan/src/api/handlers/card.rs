use axum::extract::State;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::extractors::CardUpload;
use crate::api::state::AppState;
use crate::error::{ErrorBody, Result};
use crate::services::ProcessedCard;

/// `POST /api/process-card`
///
/// Accepts a multipart form with an `image` field and returns the extracted
/// contact together with its vCard. Nothing is stored.
#[utoipa::path(
    post,
    path = "/api/process-card",
    tag = "cards",
    operation_id = "cards.process",
    request_body(content_type = "multipart/form-data", content = String, description = "Business card photo in the `image` field (JPEG, PNG, GIF or WebP, at most 5MB)"),
    responses(
        (status = 200, description = "Contact extracted", body = ProcessedCard),
        (status = 400, description = "No image uploaded or nothing could be extracted", body = ErrorBody),
        (status = 401, description = "Vision provider rejected the configured credentials", body = ErrorBody),
        (status = 413, description = "Image larger than 5MB", body = ErrorBody),
        (status = 415, description = "Unsupported image type", body = ErrorBody),
        (status = 422, description = "Image rejected by the provider's content policy", body = ErrorBody),
        (status = 429, description = "Vision provider rate limit", body = ErrorBody),
        (status = 500, description = "Any other failure", body = ErrorBody),
    )
)]
pub async fn process_card(
    State(state): State<AppState>,
    CardUpload(upload): CardUpload,
) -> Result<Json<ProcessedCard>> {
    let request_id = Uuid::new_v4();

    state
        .cards
        .process(upload)
        .instrument(tracing::info_span!("process_card", %request_id))
        .await
        .map(Json)
}
