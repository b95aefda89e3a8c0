use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{ContactRecord, UploadedImage};
use crate::processing::{intake, normalize, VCardDocument};
use crate::vision::{CardExtractor, ExtractorInfo};

/// Successful result of processing one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct ProcessedCard {
    pub contact: ContactRecord,
    /// vCard 3.0 text, lines separated by `\n`.
    #[schema(example = "BEGIN:VCARD\nVERSION:3.0\nFN:Jane Doe\nN:Doe;Jane;;;\nEMAIL;type=INTERNET;type=WORK:jane@x.com\nEND:VCARD")]
    pub vcard: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Extracting,
    Normalizing,
    Rendering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::Extracting => write!(f, "extracting"),
            Self::Normalizing => write!(f, "normalizing"),
            Self::Rendering => write!(f, "rendering"),
        }
    }
}

/// Runs one upload through validate → extract → normalize → render.
///
/// Holds no per-request state; the first failing stage ends the request.
#[derive(Clone)]
pub struct CardService {
    extractor: Arc<dyn CardExtractor>,
}

impl CardService {
    pub fn new(extractor: Arc<dyn CardExtractor>) -> Self {
        Self { extractor }
    }

    pub fn extractor_info(&self) -> ExtractorInfo {
        self.extractor.info()
    }

    pub async fn process(&self, upload: Option<UploadedImage>) -> Result<ProcessedCard> {
        debug!(stage = %Stage::Validating, "Processing business card");
        let image = intake::validate(upload)?;

        debug!(
            stage = %Stage::Extracting,
            bytes = image.len(),
            content_type = image.content_type(),
            file_name = image.file_name(),
            "Image accepted"
        );
        let raw = self.extractor.extract(&image).await?;
        drop(image);

        debug!(stage = %Stage::Normalizing, "Extraction received");
        let contact = normalize(&raw)?;

        debug!(stage = %Stage::Rendering, fields = contact.len(), "Contact normalized");
        let vcard = VCardDocument::render(&contact).into_string();

        info!(fields = contact.len(), "Business card processed");
        Ok(ProcessedCard { contact, vcard })
    }
}
