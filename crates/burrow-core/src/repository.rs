use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// A read-only view of the mapping store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the long URL stored under `code`.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Checks whether a short code is already taken.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Returns the number of stored mappings.
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new mapping. Returns `Err(Conflict)` if the code already exists;
    /// an existing mapping is never overwritten.
    async fn insert(&self, code: &ShortCode, original_url: String) -> Result<()>;
}
