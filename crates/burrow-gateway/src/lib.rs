//! HTTP gateway for the Burrow URL shortener.
//!
//! Serves the submission form, the shorten endpoint and short code
//! redirects on top of any [`burrow_core::Shortener`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
