//! Image intake validation.
//!
//! Runs before any external call. Checks, in order: a file was supplied, it
//! is at most [`MAX_IMAGE_BYTES`], and its declared MIME type is one of
//! [`ACCEPTED_MIME_TYPES`]. The first failing check wins.

use crate::error::{CardError, Result};
use crate::models::UploadedImage;

/// 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/jpg",
    "image/gif",
    "image/webp",
];

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Accepts or rejects an upload. A zero-byte file counts as missing.
pub fn validate(upload: Option<UploadedImage>) -> Result<UploadedImage> {
    let image = match upload {
        Some(image) if !image.is_empty() => image,
        _ => return Err(CardError::MissingFile),
    };

    if image.len() > MAX_IMAGE_BYTES {
        return Err(CardError::FileTooLarge);
    }

    if !is_accepted_mime(image.content_type()) {
        return Err(CardError::UnsupportedMediaType(
            image.content_type().to_string(),
        ));
    }

    Ok(image)
}

/// Compares the essence of `declared` (no parameters, any case) against the allow-list.
pub fn is_accepted_mime(declared: &str) -> bool {
    let essence = mime_essence(declared);
    ACCEPTED_MIME_TYPES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(&essence))
}

/// Works out the declared type of a multipart file part.
///
/// The part's own `Content-Type` wins. Without one, the type is guessed from
/// the file name and then sniffed from the leading bytes.
pub fn resolve_content_type(
    declared: Option<&str>,
    file_name: Option<&str>,
    bytes: &[u8],
) -> String {
    if let Some(declared) = declared.filter(|value| !value.trim().is_empty()) {
        return declared.trim().to_string();
    }

    if let Some(guess) = file_name.and_then(|name| mime_guess::from_path(name).first()) {
        tracing::debug!(
            file_name,
            content_type = guess.essence_str(),
            "No declared content type, guessed from file name"
        );
        return guess.essence_str().to_string();
    }

    let sniffed = infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());
    tracing::debug!(content_type = %sniffed, "No declared content type, sniffed from bytes");
    sniffed
}

/// MIME type used in the data URI sent upstream. `image/jpg` is not a
/// registered type, so it is sent as `image/jpeg`.
pub fn data_uri_mime(declared: &str) -> String {
    let essence = mime_essence(declared);
    if essence == "image/jpg" {
        "image/jpeg".to_string()
    } else {
        essence
    }
}

fn mime_essence(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
