use super::common::{created_response, paginated_response, success_response};
use crate::{
    errors::ServiceError,
    services::{
        orders::{CreateOrderInput, UpdateOrderInput},
        ListQuery,
    },
    validation::ValidatedJson,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.orders.list(&query).await?))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.orders.get(id).await?))
}

/// Rejected with `400` and every offending field before anything is
/// written.
async fn create_order(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateOrderInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.orders.create(input).await?))
}

async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateOrderInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.orders.update(id, input).await?))
}

async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.orders.delete(id).await?))
}

async fn get_customer_orders(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.orders.for_customer(id).await?))
}

pub fn order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/customers/:id/orders", get(get_customer_orders))
}
