use actix_web::http::StatusCode;
use actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

use crate::vision::VisionError;

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("{}", shared::MISSING_IMAGE_MESSAGE)]
    MissingImage,
    #[error("Invalid request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("Invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Image payload is empty")]
    EmptyImage,
    #[error("Invalid image URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported image URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Image URL responded with status {0}")]
    FetchStatus(u16),
    #[error("Image exceeds the {limit} byte limit")]
    ImageTooLarge { limit: usize },
    #[error(transparent)]
    Vision(#[from] VisionError),
}

// Every error body carries the same permissive CORS header as a success.
impl ResponseError for LabelError {
    fn status_code(&self) -> StatusCode {
        match self {
            LabelError::MissingImage => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
            .json(ErrorResponse {
                error: self.to_string(),
            })
    }
}
