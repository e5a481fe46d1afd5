use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, Default)]
pub struct ShortenParams {
    /// The original URL to be shortened. `None` when the caller sent nothing.
    pub original_url: Option<String>,
}

impl ShortenParams {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: Some(original_url.into()),
        }
    }
}

impl From<Option<String>> for ShortenParams {
    fn from(original_url: Option<String>) -> Self {
        Self { original_url }
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores the URL under a freshly generated short code and returns the code.
    ///
    /// Fails with `InvalidInput` when the URL is empty or missing.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode>;

    /// Resolves a short code to its original URL.
    ///
    /// Fails with `NotFound` when the code was never stored.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;
}
