use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{parse_provider_model, VisionConfig};
use crate::error::{CardError, Result};
use crate::models::{RawExtraction, UploadedImage};

use super::api::VisionApiClient;

/// Anything that can turn a card image into a [`RawExtraction`].
#[async_trait]
pub trait CardExtractor: Send + Sync {
    async fn extract(&self, image: &UploadedImage) -> Result<RawExtraction>;

    fn info(&self) -> ExtractorInfo;
}

/// Reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ExtractorInfo {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
enum VisionBackend {
    Api { client: VisionApiClient },
    Unavailable { reason: String },
}

/// The configured vision model, or the reason there is none.
#[derive(Debug, Clone)]
pub struct VisionProvider {
    backend: VisionBackend,
    provider: String,
}

impl VisionProvider {
    pub fn new(config: &VisionConfig) -> Self {
        let (provider, _) = parse_provider_model(&config.model);
        let provider = provider.to_lowercase();

        let backend = match VisionApiClient::new(config) {
            Ok(client) => {
                info!(
                    provider = %provider,
                    model = %client.model(),
                    base_url = %client.base_url(),
                    "Vision API backend initialized"
                );
                VisionBackend::Api { client }
            }
            Err(e) => {
                let reason = match e {
                    CardError::ExtractorUnavailable(reason) => reason,
                    other => other.to_string(),
                };
                warn!("Vision backend unavailable: {}", reason);
                VisionBackend::Unavailable { reason }
            }
        };

        Self { backend, provider }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: VisionBackend::Unavailable {
                reason: reason.to_string(),
            },
            provider: "none".to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, VisionBackend::Unavailable { .. })
    }
}

#[async_trait]
impl CardExtractor for VisionProvider {
    async fn extract(&self, image: &UploadedImage) -> Result<RawExtraction> {
        match &self.backend {
            VisionBackend::Api { client } => client.extract(image).await,
            VisionBackend::Unavailable { reason } => {
                Err(CardError::ExtractorUnavailable(reason.clone()))
            }
        }
    }

    fn info(&self) -> ExtractorInfo {
        match &self.backend {
            VisionBackend::Api { client } => ExtractorInfo {
                available: true,
                provider: Some(self.provider.clone()),
                model: Some(client.model().to_string()),
                reason: None,
            },
            VisionBackend::Unavailable { reason } => ExtractorInfo {
                available: false,
                provider: None,
                model: None,
                reason: Some(reason.clone()),
            },
        }
    }
}
