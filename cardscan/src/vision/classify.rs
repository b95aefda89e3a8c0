//! Upstream failure classification.
//!
//! Structured signals (HTTP status, the provider's error `type`/`code`) are
//! checked first. Message substrings are the fallback for failures that
//! carry nothing else, such as transport errors.

use reqwest::StatusCode;

use crate::error::CardError;

/// What is known about a failed call to the vision provider.
#[derive(Debug, Default, Clone)]
pub struct UpstreamFailure<'a> {
    pub status: Option<StatusCode>,
    pub error_type: Option<&'a str>,
    pub code: Option<&'a str>,
    pub message: &'a str,
}

impl<'a> UpstreamFailure<'a> {
    pub fn from_message(message: &'a str) -> Self {
        Self {
            message,
            ..Default::default()
        }
    }
}

pub fn classify(failure: &UpstreamFailure<'_>) -> CardError {
    classify_structured(failure)
        .or_else(|| classify_message(failure.message))
        .unwrap_or_else(|| CardError::Upstream(failure.message.to_string()))
}

fn classify_structured(failure: &UpstreamFailure<'_>) -> Option<CardError> {
    let message = failure.message.to_string();

    match failure.status {
        Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => {
            return Some(CardError::AuthenticationError { message });
        }
        Some(StatusCode::TOO_MANY_REQUESTS) => return Some(CardError::RateLimited { message }),
        Some(StatusCode::PAYLOAD_TOO_LARGE) => {
            return Some(CardError::PayloadTooLarge { message });
        }
        _ => {}
    }

    let code = failure.code.unwrap_or_default().to_lowercase();
    let error_type = failure.error_type.unwrap_or_default().to_lowercase();

    if code == "invalid_api_key" || error_type.contains("authentication") {
        return Some(CardError::AuthenticationError { message });
    }
    if code.contains("rate_limit") || code == "insufficient_quota" || error_type.contains("rate_limit")
    {
        return Some(CardError::RateLimited { message });
    }
    if code == "invalid_json_schema" {
        return Some(CardError::InvalidRequestSchema { message });
    }
    if code == "content_policy_violation" {
        return Some(CardError::ContentPolicyViolation);
    }

    None
}

/// Best-effort classification from message text alone.
pub fn classify_message(message: &str) -> Option<CardError> {
    let lower = message.to_lowercase();
    let owned = || message.to_string();

    if lower.contains("api key") || lower.contains("authentication") {
        Some(CardError::AuthenticationError { message: owned() })
    } else if lower.contains("rate limit") {
        Some(CardError::RateLimited { message: owned() })
    } else if lower.contains("not a business card") {
        Some(CardError::NotABusinessCard { message: owned() })
    } else if lower.contains("invalid schema") {
        Some(CardError::InvalidRequestSchema { message: owned() })
    } else if lower.contains("violates usage policies") {
        Some(CardError::ContentPolicyViolation)
    } else {
        None
    }
}
