use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;

use crate::error::CardError;
use crate::models::UploadedImage;
use crate::processing::intake;

/// Multipart field carrying the card photo.
pub const IMAGE_FIELD: &str = "image";

/// The `image` part of a multipart request, if there is one.
///
/// A request that is not multipart at all yields `None`, which the intake
/// validator reports as a missing file. Other fields are skipped.
pub struct CardUpload(pub Option<UploadedImage>);

impl<S> FromRequest<S> for CardUpload
where
    S: Send + Sync,
{
    type Rejection = CardError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = match Multipart::from_request(req, state).await {
            Ok(multipart) => multipart,
            Err(rejection) => {
                tracing::debug!(%rejection, "Request is not a multipart upload");
                return Ok(Self(None));
            }
        };

        read_image_field(multipart).await.map(Self)
    }
}

async fn read_image_field(mut multipart: Multipart) -> Result<Option<UploadedImage>, CardError> {
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let declared = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(map_multipart_error)?;

        let content_type =
            intake::resolve_content_type(declared.as_deref(), file_name.as_deref(), &bytes);

        return Ok(Some(UploadedImage::new(
            bytes.to_vec(),
            content_type,
            file_name,
        )));
    }

    Ok(None)
}

fn map_multipart_error(error: MultipartError) -> CardError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CardError::FileTooLarge
    } else {
        CardError::MalformedUpload(error.body_text())
    }
}
