use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// Request-scoped tracing middleware. Every request runs inside a span
/// carrying the method, matched route and a fresh request id, with a
/// single completion log line for latency and status.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    // Extract route pattern if available
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str())
        .unwrap_or("unknown")
        .to_string();

    let start_time = Instant::now();

    let span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        route = %route,
        request_id = %uuid::Uuid::now_v7(),
    );

    let response = next.run(request).instrument(span).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    info!(
        method = %method,
        route = %route,
        status = status_code,
        latency_ms = duration.as_millis() as u64,
        "request completed"
    );

    response
}
