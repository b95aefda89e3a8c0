use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::handlers;
use crate::error::ErrorBody;
use crate::models::ContactRecord;
use crate::services::ProcessedCard;
use crate::vision::ExtractorInfo;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cardscan API",
        version = "1.0.0",
        description = "Turns a photo of a business card into a contact record and a vCard.",
    ),
    paths(
        handlers::card::process_card,
        handlers::health::health_check,
    ),
    components(schemas(
        ProcessedCard,
        ContactRecord,
        ErrorBody,
        handlers::health::HealthData,
        ExtractorInfo,
    )),
    tags(
        (name = "cards", description = "Business card extraction"),
        (name = "health", description = "Health check"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/api/docs", ApiDoc::openapi()).into()
}
