use serde::Deserialize;

/// Body of `POST /shorten`. The field is optional so that a missing field
/// reaches the shortener and is rejected there like an empty one.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    pub long_url: Option<String>,
}
