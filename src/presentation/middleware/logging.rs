//! Request Logging and HTTP Metrics
//!
//! Trace spans per request plus Prometheus request counters.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http,
    middleware::Next,
    response::Response,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{Level, Span};

use crate::infrastructure::metrics;

/// Add HTTP trace logging layer (one span per request, one event per response).
pub fn add_tracing(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &http::Request<Body>| {
                let method = req.method().clone();
                let uri = req.uri().path().to_string();
                tracing::span!(Level::INFO, "http", %method, %uri)
            })
            .on_response(|res: &http::Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = %res.status(),
                    elapsed_ms = latency.as_millis() as u64,
                    "response"
                );
            }),
    )
}

/// Record request count and latency by matched route.
///
/// Must be installed with `route_layer` so the matched path is known;
/// anything else is bucketed as `unmatched` to keep label cardinality bounded.
pub async fn track_http_metrics(req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(req).await;

    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
