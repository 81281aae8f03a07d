use axum::{http::header::CONTENT_TYPE, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Healthz {
    pub status: String,
    pub version: String,
}

/// 进程存活探针，不访问任何上游
pub async fn healthz() -> Json<Healthz> {
    Json(Healthz {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

pub async fn metrics() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::render_prometheus(),
    )
}
