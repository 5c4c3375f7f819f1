//! Morgan-format access log:
//! `:method :url :status :res[content-length] - :response-time ms :body`

use std::time::Instant;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::info;

/// Cap on how much request body gets buffered for logging
const BODY_LOG_LIMIT: usize = 64 * 1024;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    // Buffer the body so it can be both logged and handed downstream
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, BODY_LOG_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    let request = Request::from_parts(parts, Body::from(bytes.clone()));

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();

    let content_length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    info!(
        "{} {} {} {} - {:.3} ms {}",
        method,
        uri,
        response.status().as_u16(),
        content_length,
        elapsed.as_secs_f64() * 1000.0,
        String::from_utf8_lossy(&bytes),
    );

    response
}
