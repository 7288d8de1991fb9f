//! Route definitions.

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::NormalizePath;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod api;
pub mod context;
pub mod health;
pub mod pages;
pub mod session;

/// The storefront service: the router behind trailing-slash normalization.
pub type App = NormalizePath<Router>;

/// Creates the storefront router.
///
/// Trailing slashes are stripped before routing, so `/product/{id}/`
/// reaches the product page.
pub fn create_router(state: AppState) -> App {
    let static_files = ServeDir::new(&state.config.static_dir);

    let router = Router::new()
        .route("/", get(pages::home))
        .route("/product/{id}", get(pages::product))
        .route("/search", get(pages::search))
        .route("/setCurrency", post(session::set_currency))
        .route("/logout", get(session::logout))
        .route("/rates", get(api::rates))
        .route("/convert/{currency_id}/{price}", get(api::convert))
        .route("/metrics", get(health::metrics))
        .route("/_healthz", get(health::healthz))
        .route("/robots.txt", get(health::robots))
        .nest_service("/static", static_files)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CatchPanicLayer::new())
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}
