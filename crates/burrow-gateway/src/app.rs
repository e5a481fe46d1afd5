use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, index_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(index_handler))
            // `_` is outside the short code alphabet, so this never shadows a code.
            .route("/_health", get(health_handler))
            .route("/shorten", post(shorten_handler))
            .route("/{short_code}", get(redirect_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }
}
