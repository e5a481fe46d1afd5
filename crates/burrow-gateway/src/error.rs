use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use burrow_core::ShortenerError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

pub const MISSING_URL_MESSAGE: &str = "Please provide a URL to shorten.";
pub const NOT_FOUND_MESSAGE: &str = "Short URL not found.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error("stored url is not a valid Location header: {0}")]
    InvalidRedirectTarget(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Shortener(ShortenerError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, MISSING_URL_MESSAGE).into_response()
            }
            AppError::Shortener(ShortenerError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
            }
            AppError::Shortener(err @ ShortenerError::Exhausted { .. }) => {
                error!(error = %err, "could not allocate a short code");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Could not allocate a short URL, please try again.",
                )
                    .into_response()
            }
            AppError::Shortener(err @ ShortenerError::Storage(_)) => {
                error!(error = %err, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store the shortened URL.",
                )
                    .into_response()
            }
            err @ AppError::InvalidRedirectTarget(_) => {
                error!(error = %err, "cannot redirect");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The stored URL cannot be used as a redirect target.",
                )
                    .into_response()
            }
        }
    }
}
