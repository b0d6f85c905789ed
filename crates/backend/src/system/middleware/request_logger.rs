use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_size;

/// Logs every HTTP request: method, path, status, duration and body size.
///
/// The response body is buffered to measure its real size, then re-attached.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                %method,
                %path,
                status = parts.status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "failed to read response body: {}",
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = parts.status.as_u16();
    if parts.status.is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, size = %format_size(bytes.len()), "request");
    } else if parts.status.is_client_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, size = %format_size(bytes.len()), "request");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, size = %format_size(bytes.len()), "request");
    }

    Response::from_parts(parts, Body::from(bytes))
}
