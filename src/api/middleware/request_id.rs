//! Request ID 中间件
//! 为每个请求生成或透传 X-Request-Id，用于把访问日志和上游错误日志关联起来

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 请求扩展中保存的请求ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// 从请求头中提取 request id，如果没有则生成新的
fn get_or_generate(req: &Request) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= 128)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = get_or_generate(&req);

    req.extensions_mut().insert(RequestId(request_id.clone()));
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        req.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
