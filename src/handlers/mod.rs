//! HTTP handlers, grouped per owning service.
//!
//! Handlers extract, delegate to `crate::services` and wrap the result;
//! errors surface as `ServiceError` responses.

pub mod common;
pub mod customers;
pub mod health;
pub mod orders;
pub mod products;
pub mod quotations;
pub mod reports;
pub mod staff;
pub mod user_types;
pub mod users;

use crate::AppState;
use axum::Router;
use std::sync::Arc;

/// User types, users, sales reps, accountants and customers.
pub fn user_service_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::health_routes())
        .merge(user_types::user_type_routes())
        .merge(users::user_routes())
        .merge(staff::sales_rep_routes())
        .merge(staff::accountant_routes())
        .merge(customers::customer_routes())
}

/// Products and variants.
pub fn inventory_service_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::health_routes())
        .merge(products::inventory_routes())
}

/// Quotations, invoices, orders and reports.
pub fn order_service_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::health_routes())
        .merge(quotations::quotation_routes())
        .merge(quotations::invoice_routes())
        .merge(orders::order_routes())
        .merge(reports::report_routes())
}
