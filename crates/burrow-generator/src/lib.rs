pub mod error;
pub mod random;
pub mod scripted;

pub use error::{GeneratorError, InvalidCodeLength};
pub use random::{RandomGenerator, RandomGeneratorSettings, ALPHABET};
pub use scripted::ScriptedGenerator;

use burrow_core::{ReadRepository, ShortCode};
use tracing::{trace, warn};

/// Default number of draws before giving up on finding an unused code.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1024;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// collisions are resolved by [`generate_unused`] and by the caller's
/// insert.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a candidate short code. Candidates may repeat.
    fn generate(&self) -> Self::Output;
}

/// Draws candidates until one is not present in `repository`.
///
/// Every draw is independent, so the chance of exhausting `max_attempts`
/// against a sparsely filled code space is negligible but not zero. The
/// returned code may still be taken by a concurrent writer before it is
/// inserted; callers must treat a later `Conflict` as another collision.
pub async fn generate_unused<G, R>(
    generator: &G,
    repository: &R,
    max_attempts: u32,
) -> Result<ShortCode, GeneratorError>
where
    G: Generator + ?Sized,
    R: ReadRepository + ?Sized,
{
    for attempt in 1..=max_attempts {
        let code: ShortCode = generator.generate().into();
        if !repository.exists(&code).await? {
            trace!(code = %code, attempt, "generated unused short code");
            return Ok(code);
        }
        warn!(code = %code, attempt, "short code collision, drawing again");
    }

    Err(GeneratorError::Exhausted {
        attempts: max_attempts,
    })
}
