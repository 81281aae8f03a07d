use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Level;

pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};

/// 访问日志：每个请求一条结构化日志
pub async fn trace_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    let req_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "-".to_string());

    let resp = next.run(req).await;
    let status = resp.status();
    let elapsed = start.elapsed().as_millis();
    tracing::event!(Level::INFO, request_id=%req_id, method=%method, path=%path, status=%status.as_u16(), elapsed_ms=%elapsed, "http_request");
    resp
}
