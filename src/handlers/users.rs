use super::common::{created_response, paginated_response, success_response};
use crate::{
    errors::ServiceError,
    services::{
        users::{CreateUserInput, LoginInput, RefreshInput, UpdateUserInput},
        ListQuery,
    },
    validation::ValidatedJson,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.users.list(&query).await?))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.users.get(id).await?))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateUserInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.users.create(input).await?))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateUserInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.users.update(id, input).await?))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.users.delete(id).await?))
}

async fn get_user_customers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.users.customers(id).await?))
}

async fn get_user_sales_reps(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.users.sales_reps(id).await?))
}

async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.users.login(input).await?))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<RefreshInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.users.refresh(input).await?))
}

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/login", post(login))
        .route("/users/refresh", post(refresh))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/customers", get(get_user_customers))
        .route("/users/:id/sales-reps", get(get_user_sales_reps))
}
