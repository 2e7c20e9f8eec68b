//! Router assembly.

mod common;
mod shop;

pub use common::common_routes;
pub use shop::{shop_routes, NAMESPACE, PREFIXES};

use crate::error::AppError;
use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

async fn fallback() -> AppError {
    AppError::not_found()
}

/// The full application: common and shop routes, a JSON 404 fallback, request tracing
/// and the body size cap.
pub fn app(state: AppState) -> Router {
    let body_limit = state.settings.body_limit_bytes;
    Router::new()
        .merge(common_routes())
        .merge(shop_routes())
        .fallback(fallback)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
