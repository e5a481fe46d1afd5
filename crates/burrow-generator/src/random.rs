use crate::{Generator, InvalidCodeLength};
use burrow_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use burrow_core::ShortCode;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use typed_builder::TypedBuilder;

/// The 62 symbols short codes are drawn from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGeneratorSettings {
    /// Number of symbols per code. Must be between 1 and 64.
    #[builder(default = 6)]
    length: usize,
}

impl Default for RandomGeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Draws fixed-length codes uniformly at random from [`ALPHABET`].
///
/// With the default length there are 62^6 (about 5.6e10) possible codes.
/// The random source is injectable through [`RandomGenerator::from_rng`],
/// which lets tests run against a seeded generator.
pub struct RandomGenerator<R = StdRng> {
    rng: Mutex<R>,
    length: usize,
}

impl RandomGeneratorSettings {
    /// Checks that codes of this length are valid short codes.
    pub fn validate(&self) -> Result<(), InvalidCodeLength> {
        if (MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            Ok(())
        } else {
            Err(InvalidCodeLength {
                length: self.length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            })
        }
    }
}

impl RandomGenerator<StdRng> {
    /// Creates a generator seeded from the operating system.
    pub fn new(settings: RandomGeneratorSettings) -> Result<Self, InvalidCodeLength> {
        Self::from_rng(StdRng::from_os_rng(), settings)
    }
}

impl Default for RandomGenerator<StdRng> {
    fn default() -> Self {
        // The default length is always in range.
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
            length: RandomGeneratorSettings::default().length,
        }
    }
}

impl<R: RngCore + Send + 'static> RandomGenerator<R> {
    pub fn from_rng(rng: R, settings: RandomGeneratorSettings) -> Result<Self, InvalidCodeLength> {
        settings.validate()?;
        Ok(Self {
            rng: Mutex::new(rng),
            length: settings.length,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl<R> std::fmt::Debug for RandomGenerator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomGenerator")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl<R: RngCore + Send + 'static> Generator for RandomGenerator<R> {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = self.rng.lock();
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
