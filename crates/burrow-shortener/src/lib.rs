//! URL shortener service implementation.
//!
//! [`ShortenerService`] ties a mapping store to a code generator and
//! implements the [`Shortener`] operations the HTTP gateway consumes.
//! Core types are re-exported from `burrow_core`.

pub mod service;

pub use burrow_core::{ShortCode, ShortenParams, Shortener, ShortenerError};
pub use service::{ShortenerService, ShortenerSettings};
