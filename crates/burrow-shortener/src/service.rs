use async_trait::async_trait;
use burrow_core::{
    Repository, ShortCode, ShortenParams, Shortener, ShortenerError, StorageError,
};
use burrow_generator::{generate_unused, Generator, GeneratorError, DEFAULT_MAX_ATTEMPTS};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Upper bound on candidate draws, and separately on insert retries
    /// after a `Conflict`.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - Input validation (the long URL must be present and non-empty)
/// - Collision resolution between generated codes and stored ones
/// - Lookups for redirects
///
/// The URL itself is not checked for well-formedness; any non-empty
/// string is stored as given.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with default settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, ShortenerSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
        }
    }

    /// Returns the underlying mapping store.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn validate_url(original_url: Option<String>) -> Result<String, ShortenerError> {
        match original_url {
            Some(url) if !url.is_empty() => Ok(url),
            Some(_) => Err(ShortenerError::InvalidInput(
                "URL cannot be empty".to_string(),
            )),
            None => Err(ShortenerError::InvalidInput("URL is required".to_string())),
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortCode, ShortenerError> {
        let original_url = Self::validate_url(params.original_url)?;
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            let code = generate_unused(&*self.generator, &*self.repository, max_attempts)
                .await
                .map_err(generator_to_shortener_error)?;

            // Another request may have claimed the code since it was checked.
            match self.repository.insert(&code, original_url.clone()).await {
                Ok(()) => {
                    info!(code = %code, url = %original_url, "shortened url");
                    return Ok(code);
                }
                Err(StorageError::Conflict(_)) => {
                    warn!(code = %code, attempt, "short code taken during insert, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ShortenerError::Exhausted {
            attempts: max_attempts,
        })
    }

    async fn resolve(&self, code: &ShortCode) -> Result<String, ShortenerError> {
        trace!(code = %code, "resolving short code");

        match self.repository.get(code).await? {
            Some(url) => {
                debug!(code = %code, url = %url, "resolved short code");
                Ok(url)
            }
            None => {
                trace!(code = %code, "short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
        }
    }
}

/// Converts a GeneratorError to a ShortenerError.
fn generator_to_shortener_error(e: GeneratorError) -> ShortenerError {
    match e {
        GeneratorError::Exhausted { attempts } => ShortenerError::Exhausted { attempts },
        GeneratorError::Storage(source) => ShortenerError::Storage(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use burrow_core::ReadRepository;
    use burrow_generator::{RandomGenerator, RandomGeneratorSettings, ScriptedGenerator};
    use burrow_storage::{InMemoryRepository, JsonFileRepository};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn test_service() -> ShortenerService<InMemoryRepository, RandomGenerator> {
        let generator = RandomGenerator::from_rng(
            StdRng::seed_from_u64(2024),
            RandomGeneratorSettings::default(),
        )
        .unwrap();
        ShortenerService::new(InMemoryRepository::new(), generator)
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    /// Reports every code as free so collisions only surface on insert,
    /// as they would when another writer wins the race.
    struct RacyRepository(InMemoryRepository);

    #[async_trait]
    impl ReadRepository for RacyRepository {
        async fn get(&self, code: &ShortCode) -> burrow_core::error::Result<Option<String>> {
            self.0.get(code).await
        }

        async fn exists(&self, _code: &ShortCode) -> burrow_core::error::Result<bool> {
            Ok(false)
        }

        async fn len(&self) -> burrow_core::error::Result<usize> {
            self.0.len().await
        }
    }

    #[async_trait]
    impl Repository for RacyRepository {
        async fn insert(
            &self,
            code: &ShortCode,
            original_url: String,
        ) -> burrow_core::error::Result<()> {
            self.0.insert(code, original_url).await
        }
    }

    #[tokio::test]
    async fn shorten_then_resolve() {
        let service = test_service();

        let code = service
            .shorten(ShortenParams::new("http://example.com"))
            .await
            .unwrap();

        assert_eq!(code.as_str().len(), 6);
        assert!(code.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(service.resolve(&code).await.unwrap(), "http://example.com");
    }

    #[tokio::test]
    async fn shorten_empty_url_fails() {
        let service = test_service();

        let err = service.shorten(ShortenParams::new("")).await.unwrap_err();

        assert!(matches!(err, ShortenerError::InvalidInput(_)));
        assert_eq!(service.repository().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn shorten_missing_url_fails() {
        let service = test_service();

        let err = service
            .shorten(ShortenParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenerError::InvalidInput(_)));
        assert_eq!(service.repository().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn shorten_accepts_any_non_empty_string() {
        let service = test_service();

        for url in ["not-a-valid-url", " ", "http://example.com/ä?q=1#frag"] {
            let code = service.shorten(ShortenParams::new(url)).await.unwrap();
            assert_eq!(service.resolve(&code).await.unwrap(), url);
        }
    }

    #[tokio::test]
    async fn resolve_nonexistent_code() {
        let service = test_service();

        let err = service.resolve(&code("abc123")).await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(ref c) if c == "abc123"));
    }

    #[tokio::test]
    async fn repeated_shortens_store_distinct_codes() {
        let service = test_service();
        let mut codes = HashSet::new();

        for _ in 0..200 {
            let code = service
                .shorten(ShortenParams::new("http://example.com"))
                .await
                .unwrap();
            codes.insert(code);
        }

        assert_eq!(codes.len(), 200);
        assert_eq!(service.repository().len().await.unwrap(), 200);
    }

    #[tokio::test]
    async fn collision_draws_again_without_overwriting() {
        let repo = InMemoryRepository::new();
        repo.insert(&code("aaaaaa"), "http://first.com".to_string())
            .await
            .unwrap();
        let service = ShortenerService::new(repo, ScriptedGenerator::new(["aaaaaa", "bbbbbb"]));

        let code_b = service
            .shorten(ShortenParams::new("http://second.com"))
            .await
            .unwrap();

        assert_eq!(code_b.as_str(), "bbbbbb");
        assert_eq!(service.resolve(&code("aaaaaa")).await.unwrap(), "http://first.com");
        assert_eq!(service.resolve(&code_b).await.unwrap(), "http://second.com");
    }

    #[tokio::test]
    async fn insert_conflict_is_retried() {
        let inner = InMemoryRepository::new();
        inner
            .insert(&code("aaaaaa"), "http://first.com".to_string())
            .await
            .unwrap();
        let service = ShortenerService::new(
            RacyRepository(inner),
            ScriptedGenerator::new(["aaaaaa", "aaaaaa", "cccccc"]),
        );

        let code_c = service
            .shorten(ShortenParams::new("http://second.com"))
            .await
            .unwrap();

        assert_eq!(code_c.as_str(), "cccccc");
        assert_eq!(service.resolve(&code("aaaaaa")).await.unwrap(), "http://first.com");
    }

    #[tokio::test]
    async fn exhausted_code_space_is_reported() {
        let repo = InMemoryRepository::new();
        repo.insert(&code("aaaaaa"), "http://first.com".to_string())
            .await
            .unwrap();
        let settings = ShortenerSettings::builder().max_attempts(4).build();
        let service =
            ShortenerService::with_settings(repo, ScriptedGenerator::new(["aaaaaa"]), settings);

        let err = service
            .shorten(ShortenParams::new("http://second.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenerError::Exhausted { attempts: 4 }));
        assert_eq!(service.repository().len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn shortened_urls_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let repo = JsonFileRepository::load(&path).await.unwrap();
        let service = ShortenerService::new(repo, RandomGenerator::default());

        let first = service
            .shorten(ShortenParams::new("http://example.com"))
            .await
            .unwrap();
        let second = service
            .shorten(ShortenParams::new("http://example.org"))
            .await
            .unwrap();

        let reloaded = ShortenerService::new(
            JsonFileRepository::load(&path).await.unwrap(),
            RandomGenerator::default(),
        );
        assert_eq!(reloaded.resolve(&first).await.unwrap(), "http://example.com");
        assert_eq!(reloaded.resolve(&second).await.unwrap(), "http://example.org");
        assert_eq!(
            reloaded.repository().entries(),
            service.repository().entries()
        );
    }

    #[tokio::test]
    async fn concurrent_shortens_get_distinct_codes() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::load(dir.path().join("data.json"))
            .await
            .unwrap();
        let service = ShortenerService::new(repo, RandomGenerator::default());
        let mut handles = vec![];

        for i in 0..50 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .shorten(ShortenParams::new(format!("http://example{i}.com")))
                    .await
                    .unwrap()
            }));
        }

        let mut codes = HashSet::new();
        for handle in handles {
            codes.insert(handle.await.unwrap());
        }

        assert_eq!(codes.len(), 50);
        assert_eq!(service.repository().len().await.unwrap(), 50);
    }
}
