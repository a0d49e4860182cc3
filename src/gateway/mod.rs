//! API gateway: one public entry point in front of the user, inventory and
//! order services.
//!
//! Requests are forwarded by path prefix. The gateway owns no data; it only
//! answers `/health`, applies rate limiting and returns a JSON `404` for
//! paths no service claims.

pub mod rate_limit;

use crate::{config::AppConfig, errors::ServiceError, tracing::REQUEST_ID_HEADER};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub use rate_limit::{RateLimitConfig, RateLimiter};

/// Largest request body the gateway buffers before forwarding.
pub const MAX_PROXY_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    User,
    Inventory,
    Order,
}

impl Upstream {
    pub fn name(&self) -> &'static str {
        match self {
            Self::User => "user-service",
            Self::Inventory => "inventory-service",
            Self::Order => "order-service",
        }
    }
}

const ROUTE_TABLE: &[(&str, Upstream)] = &[
    ("/user-types", Upstream::User),
    ("/users", Upstream::User),
    ("/sales-reps", Upstream::User),
    ("/accountants", Upstream::User),
    ("/customers", Upstream::User),
    ("/products", Upstream::Inventory),
    ("/variants", Upstream::Inventory),
    ("/quotations", Upstream::Order),
    ("/invoices", Upstream::Order),
    ("/orders", Upstream::Order),
    ("/report", Upstream::Order),
];

fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Picks the service owning `path`. A customer's order history
/// (`/customers/:id/orders`) belongs to the order service; every other
/// `/customers` path to the user service.
pub fn resolve_upstream(path: &str) -> Option<Upstream> {
    if has_segment_prefix(path, "/customers") {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        if segments.len() == 3 && segments[2] == "orders" {
            return Some(Upstream::Order);
        }
    }

    ROUTE_TABLE
        .iter()
        .find(|(prefix, _)| has_segment_prefix(path, prefix))
        .map(|(_, upstream)| *upstream)
}

#[derive(Clone)]
pub struct GatewayState {
    client: reqwest::Client,
    user_url: String,
    inventory_url: String,
    order_url: String,
}

impl GatewayState {
    pub fn new(
        user_url: impl Into<String>,
        inventory_url: impl Into<String>,
        order_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InternalError(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            user_url: user_url.into(),
            inventory_url: inventory_url.into(),
            order_url: order_url.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(
            config.user_service_url.clone(),
            config.inventory_service_url.clone(),
            config.order_service_url.clone(),
            config.upstream_timeout(),
        )
    }

    pub fn base_url(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::User => &self.user_url,
            Upstream::Inventory => &self.inventory_url,
            Upstream::Order => &self.order_url,
        }
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

fn forwardable_headers(source: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        if is_hop_by_hop(name) || name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

async fn gateway_health() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "service": "api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Forwards the request to the owning service and relays its response
/// unchanged apart from hop-by-hop headers.
#[instrument(skip_all, fields(method = %request.method(), path = %request.uri().path()))]
async fn proxy(
    State(state): State<Arc<GatewayState>>,
    request: Request,
) -> Result<Response, ServiceError> {
    let path = request.uri().path().to_string();
    let Some(upstream) = resolve_upstream(&path) else {
        debug!("no upstream for path");
        return Err(ServiceError::NotFound(format!("Route {} not found", path)));
    };

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or(path);
    let target = format!(
        "{}{}",
        state.base_url(upstream).trim_end_matches('/'),
        path_and_query
    );

    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_PROXY_BODY_BYTES)
        .await
        .map_err(|e| ServiceError::invalid_field("body", e.to_string()))?;

    let mut headers = forwardable_headers(&parts.headers);
    if let Some(rid) = crate::tracing::current_request_id() {
        if let Ok(value) = HeaderValue::from_str(rid.as_str()) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
    }

    let upstream_response = state
        .client
        .request(parts.method, &target)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            warn!(upstream = upstream.name(), error = %e, "upstream request failed");
            ServiceError::UpstreamError(format!("{} unavailable", upstream.name()))
        })?;

    let status = upstream_response.status();
    let response_headers = forwardable_headers(upstream_response.headers());
    let bytes = upstream_response.bytes().await.map_err(|e| {
        warn!(upstream = upstream.name(), error = %e, "upstream body read failed");
        ServiceError::UpstreamError(format!("{} sent an unreadable response", upstream.name()))
    })?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

/// Gateway routes without layers; see `crate::gateway_router` for the
/// served stack.
pub fn routes(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(gateway_health))
        .fallback(proxy)
        .with_state(state)
}
