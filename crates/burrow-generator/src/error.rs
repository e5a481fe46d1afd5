use burrow_core::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("no unused short code found after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("storage error while checking candidate: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("code length must be between {min} and {max}, got {length}")]
pub struct InvalidCodeLength {
    pub length: usize,
    pub min: usize,
    pub max: usize,
}
