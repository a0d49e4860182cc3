use super::common::{created_response, paginated_response, success_response};
use crate::{
    errors::ServiceError,
    services::{
        customers::{CreateCustomerInput, UpdateCustomerInput},
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

async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.customers.list(&query).await?))
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.customers.get(id).await?))
}

async fn create_customer(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateCustomerInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.customers.create(input).await?))
}

async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateCustomerInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(
        state.services.customers.update(id, input).await?,
    ))
}

async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.customers.delete(id).await?))
}

/// Customer CRUD, owned by the user service. Order history lives on the
/// order service under `/customers/:id/orders`.
pub fn customer_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
}
