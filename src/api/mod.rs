use std::sync::Arc;

use axum::{middleware::from_fn, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::app_state::AppState;

pub mod handlers;
pub mod middleware;
pub mod solana_api;
pub mod staking_api;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        // EVM
        .route("/staking-info/:address", get(staking_api::get_staking_info))
        // Solana
        .route("/solana/token-supply", get(solana_api::get_token_supply))
        .route(
            "/solana/token-balance/:address",
            get(solana_api::get_token_balance),
        )
        // 运维
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::request_id_middleware))
                .layer(from_fn(middleware::trace_log))
                // handler 内部 panic 也只影响当前请求，返回 500
                .layer(CatchPanicLayer::new()),
        )
        .with_state(state)
}
