//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the short code type, the repository contract the
//! mapping store implements, and the shortener trait consumed by the
//! HTTP gateway.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{CoreError, ShortenerError, StorageError};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use shortener::{ShortenParams, Shortener};
