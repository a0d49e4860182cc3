//! Sales reps and accountants share one payload shape and one route layout.

use super::common::{created_response, paginated_response, success_response};
use crate::{
    errors::ServiceError,
    services::{
        sales_reps::{CreateStaffInput, UpdateStaffInput},
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

async fn list_sales_reps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.sales_reps.list(&query).await?))
}

async fn get_sales_rep(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.sales_reps.get(id).await?))
}

async fn create_sales_rep(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateStaffInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.sales_reps.create(input).await?))
}

async fn update_sales_rep(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateStaffInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(
        state.services.sales_reps.update(id, input).await?,
    ))
}

async fn delete_sales_rep(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.sales_reps.delete(id).await?))
}

async fn list_accountants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.accountants.list(&query).await?))
}

async fn get_accountant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.accountants.get(id).await?))
}

async fn create_accountant(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateStaffInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.accountants.create(input).await?))
}

async fn update_accountant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateStaffInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(
        state.services.accountants.update(id, input).await?,
    ))
}

async fn delete_accountant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.accountants.delete(id).await?))
}

pub fn sales_rep_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sales-reps", get(list_sales_reps).post(create_sales_rep))
        .route(
            "/sales-reps/:id",
            get(get_sales_rep)
                .put(update_sales_rep)
                .delete(delete_sales_rep),
        )
}

pub fn accountant_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accountants", get(list_accountants).post(create_accountant))
        .route(
            "/accountants/:id",
            get(get_accountant)
                .put(update_accountant)
                .delete(delete_accountant),
        )
}
