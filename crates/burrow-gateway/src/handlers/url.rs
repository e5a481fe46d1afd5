use crate::error::{AppError, Result};
use crate::model::ShortenForm;
use crate::state::AppState;
use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use burrow_core::{ShortCode, ShortenParams, ShortenerError};
use tracing::debug;

pub async fn shorten_handler(
    State(state): State<AppState>,
    form: std::result::Result<Form<ShortenForm>, FormRejection>,
) -> Result<String> {
    // A body that is not a urlencoded form carries no `long_url` field.
    let long_url = match form {
        Ok(Form(form)) => form.long_url,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable shorten form");
            None
        }
    };

    let code = state
        .shortener()
        .shorten(ShortenParams::from(long_url))
        .await?;

    Ok(format!("Shortened URL: {}", code.to_url(state.base_url())))
}

pub async fn redirect_handler(
    short_code: std::result::Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Response> {
    let Path(short_code) =
        short_code.map_err(|rejection| ShortenerError::NotFound(rejection.body_text()))?;
    let code = ShortCode::new(short_code).map_err(ShortenerError::from)?;
    let original_url = state.shortener().resolve(&code).await?;

    let location = HeaderValue::from_bytes(original_url.as_bytes())
        .map_err(|_| AppError::InvalidRedirectTarget(original_url.clone()))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
