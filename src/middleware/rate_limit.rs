//! Fixed-window rate limiting middleware
//!
//! One algorithm, instantiated twice: a general limiter over the whole
//! `/api` surface and a stricter one on the login route. Counters are
//! kept in-process per client address; this is best-effort throttling,
//! not a hard quota.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::error::AppError;

/// Upper bound on tracked addresses before stale windows are evicted
const MAX_TRACKED_KEYS: usize = 10_000;

/// Fixed-window request counter per key
///
/// A window opens at the first counted request for a key and resets to
/// zero once it elapses; resets are wall-clock based, not sliding.
pub struct FixedWindowLimiter {
    max_requests: u64,
    window_secs: u64,
    windows: Mutex<HashMap<String, Window>>,
}

struct Window {
    started_at: u64,
    count: u64,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u64, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check and record a request. Returns `true` if allowed.
    pub fn check(&self, key: &str) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.check_at(key, now)
    }

    /// Clock-injected variant of [`check`](Self::check), also used by tests
    fn check_at(&self, key: &str, now: u64) -> bool {
        let mut windows = self.windows.lock().unwrap();

        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now >= window.started_at + self.window_secs {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;

        if windows.len() > MAX_TRACKED_KEYS {
            let window_secs = self.window_secs;
            windows.retain(|_, w| now < w.started_at + window_secs);
        }

        true
    }
}

/// Rate limit state shared across requests
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Arc<FixedWindowLimiter>,
    message: String,
    enabled: bool,
}

impl RateLimitState {
    pub fn new(
        max_requests: u64,
        window_secs: u64,
        message: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            limiter: Arc::new(FixedWindowLimiter::new(max_requests, window_secs)),
            message: message.into(),
            enabled,
        }
    }

    /// Create a no-op rate limit state (for testing or when disabled)
    pub fn noop() -> Self {
        Self::new(u64::MAX, 60, "Trop de requêtes", false)
    }
}

/// Rate limiting middleware function
///
/// Counts the request against the caller's address and rejects with 429
/// once the window cap is reached. Every rejection in the window carries
/// the same message, no matter how far over the cap the caller is.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.enabled {
        return next.run(request).await;
    }

    let ip = extract_client_ip(&request);
    if state.limiter.check(&ip) {
        next.run(request).await
    } else {
        tracing::warn!(client = %ip, "Rate limit exceeded");
        AppError::RateLimited(state.message.clone()).into_response()
    }
}

/// Middleware that injects `X-Real-IP` from the socket address when no
/// proxy headers are present, so the limiter always has an address to key
/// on even for direct connections.
pub async fn inject_client_ip(mut request: Request<Body>, next: Next) -> Response {
    let headers = request.headers();
    if !headers.contains_key("x-forwarded-for") && !headers.contains_key("x-real-ip") {
        if let Some(addr) = request
            .extensions()
            .get::<axum::extract::ConnectInfo<SocketAddr>>()
        {
            let ip = addr.0.ip().to_string();
            if let Ok(value) = ip.parse() {
                request.headers_mut().insert("x-real-ip", value);
            }
        }
    }

    next.run(request).await
}

fn extract_client_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
