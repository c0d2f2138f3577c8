//! Request tracking middleware.
//!
//! Assigns or propagates the X-Request-ID correlation header, times the
//! request, and writes one access log line per request.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use log::{info, warn};
use std::time::Instant;
use uuid::Uuid;

/// Correlation id attached to every request, readable by handlers
/// through `Extension<RequestId>`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

pub async fn track_request(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let mut response = next.run(req).await;

    let elapsed = start.elapsed().as_secs_f64();
    crate::metrics::observe_request_latency(elapsed);

    let millis = elapsed * 1000.0;
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert("x-request-id", value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{:.2}", millis)) {
        headers.insert("x-process-time", value);
    }

    let status = response.status().as_u16();
    if status >= 400 {
        warn!("📡 {} {} → {} ({:.2}ms)", method, path, status, millis);
    } else {
        info!("📡 {} {} → {} ({:.2}ms)", method, path, status, millis);
    }

    response
}
