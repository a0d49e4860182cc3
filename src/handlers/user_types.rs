use super::common::{created_response, paginated_response, success_response};
use crate::{
    errors::ServiceError,
    services::{
        user_types::{CreateUserTypeInput, UpdateUserTypeInput},
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

async fn list_user_types(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    let page = state.services.user_types.list(&query).await?;
    Ok(paginated_response(page))
}

async fn get_user_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.user_types.get(id).await?))
}

async fn create_user_type(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateUserTypeInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.user_types.create(input).await?))
}

async fn update_user_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateUserTypeInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(
        state.services.user_types.update(id, input).await?,
    ))
}

async fn delete_user_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.user_types.delete(id).await?))
}

pub fn user_type_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user-types", get(list_user_types).post(create_user_type))
        .route(
            "/user-types/:id",
            get(get_user_type)
                .put(update_user_type)
                .delete(delete_user_type),
        )
}
