use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a business card request can fail.
///
/// The `Display` text is the human-readable `details` string sent to the
/// caller. Upstream variants keep the provider's raw message for logging
/// only; it never reaches the response body.
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Please upload a business card image")]
    MissingFile,

    #[error("Please upload an image smaller than 5MB")]
    FileTooLarge,

    #[error("Unsupported file type '{0}'. Please upload a valid image file (JPEG, PNG, GIF, or WebP)")]
    UnsupportedMediaType(String),

    #[error("Could not read the uploaded form: {0}")]
    MalformedUpload(String),

    #[error("Model refused to process the image: {0}")]
    ModelRefusal(String),

    #[error("The image contains content that violates usage policies")]
    ContentPolicyViolation,

    #[error("The response was truncated due to token limits. Try again with a clearer image.")]
    TruncatedResponse,

    #[error("The model returned output that could not be parsed: {0}")]
    MalformedModelOutput(String),

    #[error("Authentication error: Invalid API key or missing permissions")]
    AuthenticationError { message: String },

    #[error("Rate limit exceeded: Please try again later")]
    RateLimited { message: String },

    #[error("The image file is too large. Please use a smaller image")]
    PayloadTooLarge { message: String },

    #[error("There was an issue with the data format. Please contact support.")]
    InvalidRequestSchema { message: String },

    #[error("The uploaded image does not appear to be a business card")]
    NotABusinessCard { message: String },

    #[error("Could not extract any information from the image. Please try again with a clearer image.")]
    NoDataExtracted,

    #[error("Card extraction is unavailable: {0}")]
    ExtractorUnavailable(String),

    #[error("Extraction service error: {0}")]
    Upstream(String),
}

impl CardError {
    pub fn status(&self) -> StatusCode {
        match self {
            CardError::AuthenticationError { .. } => StatusCode::UNAUTHORIZED,
            CardError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            CardError::ContentPolicyViolation => StatusCode::UNPROCESSABLE_ENTITY,
            CardError::FileTooLarge | CardError::PayloadTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            CardError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            CardError::MissingFile | CardError::MalformedUpload(_) | CardError::NoDataExtracted => {
                StatusCode::BAD_REQUEST
            }
            CardError::ModelRefusal(_)
            | CardError::TruncatedResponse
            | CardError::MalformedModelOutput(_)
            | CardError::InvalidRequestSchema { .. }
            | CardError::NotABusinessCard { .. }
            | CardError::ExtractorUnavailable(_)
            | CardError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for the `error` field of the response body.
    pub fn label(&self) -> &'static str {
        match self {
            CardError::MissingFile => "No image file uploaded",
            CardError::FileTooLarge => "Image file too large",
            CardError::UnsupportedMediaType(_) => "Invalid file type",
            CardError::MalformedUpload(_) => "Invalid upload",
            _ => "Failed to process business card",
        }
    }

    /// Raw upstream message, when the error was classified from a provider failure.
    pub fn upstream_message(&self) -> Option<&str> {
        match self {
            CardError::AuthenticationError { message }
            | CardError::RateLimited { message }
            | CardError::PayloadTooLarge { message }
            | CardError::InvalidRequestSchema { message }
            | CardError::NotABusinessCard { message } => Some(message),
            _ => None,
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Short label, e.g. `"Invalid file type"`.
    pub error: String,
    /// Human-readable explanation safe to show to end users.
    pub details: String,
}

impl From<&CardError> for ErrorBody {
    fn from(err: &CardError) -> Self {
        Self {
            error: err.label().to_string(),
            details: err.to_string(),
        }
    }
}

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                upstream = self.upstream_message(),
                error = ?self,
                "Business card request failed"
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                upstream = self.upstream_message(),
                error = %self,
                "Business card request rejected"
            );
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, CardError>;
