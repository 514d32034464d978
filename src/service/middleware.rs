//! Service middleware for metrics and request tracking.
//!
//! ## Metrics Exposed
//!
//! - `request` - path pattern, method, status and latency of every request
//! - `quiz_draw` - outcome of every quiz draw and the session length so far

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::info;

/// Metrics middleware that records request counts and latency.
///
/// Uses tracing; metrics are aggregated from logs.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "trivia_kernel::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Replaces numeric path segments (question and category ids) with `:id`.
fn normalize_path(path: &str) -> String {
    static ID_SEGMENT: OnceLock<regex_lite::Regex> = OnceLock::new();
    let id_segment = ID_SEGMENT.get_or_init(|| {
        regex_lite::Regex::new(r"/-?[0-9]+(/|$)").expect("static regex")
    });

    // Adjacent numeric segments share a slash, so run until stable.
    let mut normalized = path.to_string();
    loop {
        let next = id_segment.replace_all(&normalized, "/:id$1").to_string();
        if next == normalized {
            return normalized;
        }
        normalized = next;
    }
}

/// Record the outcome of a quiz draw.
pub fn record_quiz_draw(exhausted: bool, previous_count: usize) {
    let result = if exhausted { "exhausted" } else { "served" };
    info!(
        target: "trivia_kernel::metrics",
        metric_type = "quiz_draw",
        result = result,
        previous_count = previous_count,
        "quiz_draw_metric"
    );
}
