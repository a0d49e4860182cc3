//! Fixed-window request limiting for the gateway.
//!
//! Each client key (forwarded IP, real IP, or peer address) gets
//! `max_requests` per `window`. The counter lives in a `DashMap` shared by
//! every request task of the gateway process.

use crate::errors::ServiceError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

fn num_to_header_value<T: ToString>(n: T) -> HeaderValue {
    HeaderValue::from_str(&n.to_string()).unwrap_or_else(|_| HeaderValue::from_static("0"))
}

#[derive(Debug, Clone)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

impl WindowEntry {
    fn new(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }

    fn roll(&mut self, now: Instant, window: Duration) {
        if now.duration_since(self.window_start) >= window {
            self.count = 0;
            self.window_start = now;
        }
    }

    fn time_until_reset(&self, now: Instant, window: Duration) -> Duration {
        window.saturating_sub(now.duration_since(self.window_start))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

impl RateLimitDecision {
    fn apply_headers(&self, response: &mut Response) {
        let headers = response.headers_mut();
        headers.insert(LIMIT_HEADER, num_to_header_value(self.limit));
        headers.insert(REMAINING_HEADER, num_to_header_value(self.remaining));
        headers.insert(RESET_HEADER, num_to_header_value(self.reset_after.as_secs()));
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    entries: Arc<DashMap<String, WindowEntry>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Counts one request against `key` and reports whether it fits in the
    /// current window. Rejected requests are not counted.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let RateLimitConfig {
            max_requests,
            window,
        } = self.config;

        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| WindowEntry::new(now));
        entry.roll(now, window);

        let allowed = entry.count < max_requests;
        if allowed {
            entry.count += 1;
        }

        RateLimitDecision {
            allowed,
            limit: max_requests,
            remaining: max_requests.saturating_sub(entry.count),
            reset_after: entry.time_until_reset(now, window),
        }
    }

    /// Drops entries whose window has ended.
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        let window = self.config.window;
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < window);
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }
}

/// Client key: first `x-forwarded-for` hop, then `x-real-ip`, then the
/// peer address when the server was started with connect info.
pub fn client_key(request: &Request) -> String {
    let headers = request.headers();
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return format!("ip:{}", ip);
    }

    if let Some(ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return format!("ip:{}", ip.trim());
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| format!("ip:{}", addr.ip()))
        .unwrap_or_else(|| "ip:unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    let decision = limiter.check(&key);

    if !decision.allowed {
        warn!(key = %key, "rate limit exceeded");
        let mut response = ServiceError::RateLimitExceeded.into_response();
        decision.apply_headers(&mut response);
        return response;
    }

    let mut response = next.run(request).await;
    decision.apply_headers(&mut response);
    response
}

/// Periodically evicts finished windows so idle clients do not accumulate.
pub fn spawn_cleanup_task(limiter: RateLimiter) -> tokio::task::JoinHandle<()> {
    let period = limiter.config().window;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            limiter.cleanup_expired();
        }
    })
}
