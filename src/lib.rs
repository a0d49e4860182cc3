//! Beauty ERP backend library
//!
//! Persistence schema, entities, validation, services and the HTTP surface
//! of the user, inventory and order services plus the API gateway. The
//! `beauty-erp` binary picks which of them a process serves.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod schema;
pub mod services;
pub mod tracing;
pub mod validation;

use axum::{extract::Request, middleware, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

pub use config::ServiceRole;
pub use errors::ServiceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared state of one service process.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: services::AppServices,
    /// Reported by `/health`.
    pub service_name: &'static str,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        service_name: &'static str,
    ) -> Self {
        let services = services::AppServices::new(db.clone(), auth::AuthConfig::from(&config));
        Self {
            db,
            config,
            services,
            service_name,
        }
    }
}

pub fn service_name(role: ServiceRole) -> &'static str {
    match role {
        ServiceRole::User => "user-service",
        ServiceRole::Inventory => "inventory-service",
        ServiceRole::Order => "order-service",
        ServiceRole::Gateway => "api-gateway",
    }
}

async fn route_not_found(request: Request) -> ServiceError {
    ServiceError::NotFound(format!("Route {} not found", request.uri().path()))
}

fn cors_layer(config: &config::AppConfig) -> CorsLayer {
    if config.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::permissive()
    }
}

/// Common stack of every served router: timeout, tracing spans and the
/// request id (outermost, so spans and error bodies both see it).
fn with_http_stack(router: Router, config: &config::AppConfig) -> Router {
    router
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors_layer(config))
        .layer(tracing::configure_http_tracing())
        .layer(middleware::from_fn(tracing::request_id_middleware))
}

fn service_router(routes: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    let config = state.config.clone();
    with_http_stack(routes.fallback(route_not_found).with_state(state), &config)
}

pub fn user_router(state: Arc<AppState>) -> Router {
    service_router(handlers::user_service_routes(), state)
}

pub fn inventory_router(state: Arc<AppState>) -> Router {
    service_router(handlers::inventory_service_routes(), state)
}

pub fn order_router(state: Arc<AppState>) -> Router {
    service_router(handlers::order_service_routes(), state)
}

/// Router for one service role. The gateway is built with
/// [`gateway_router`] since it holds no database state.
pub fn router_for(role: ServiceRole, state: Arc<AppState>) -> Option<Router> {
    match role {
        ServiceRole::User => Some(user_router(state)),
        ServiceRole::Inventory => Some(inventory_router(state)),
        ServiceRole::Order => Some(order_router(state)),
        ServiceRole::Gateway => None,
    }
}

/// Gateway with rate limiting inside the request-id scope, so a `429`
/// still carries the id.
pub fn gateway_router(
    gateway: Arc<gateway::GatewayState>,
    limiter: gateway::RateLimiter,
    config: &config::AppConfig,
) -> Router {
    let routes = gateway::routes(gateway).layer(middleware::from_fn_with_state(
        limiter,
        gateway::rate_limit::rate_limit_middleware,
    ));
    with_http_stack(routes, config)
}
