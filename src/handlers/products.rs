use super::common::{created_response, paginated_response, success_response};
use crate::{
    errors::ServiceError,
    services::{
        products::{CreateProductInput, UpdateProductInput},
        variants::{CreateVariantInput, UpdateVariantInput},
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

async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.products.list(&query).await?))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.products.get(id).await?))
}

async fn get_product_with_variants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(
        state.services.products.get_with_variants(id).await?,
    ))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateProductInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.products.create(input).await?))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateProductInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.products.update(id, input).await?))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.products.delete(id).await?))
}

async fn list_variants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.variants.list(&query).await?))
}

async fn low_stock_variants(State(state): State<Arc<AppState>>) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.variants.low_stock().await?))
}

async fn get_variant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.variants.get(id).await?))
}

async fn get_variant_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.variants.product_of(id).await?))
}

async fn create_variant(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateVariantInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.variants.create(input).await?))
}

async fn update_variant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateVariantInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.variants.update(id, input).await?))
}

async fn delete_variant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.variants.delete(id).await?))
}

/// Inventory service routes: products and their variants.
pub fn inventory_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/variants", get(get_product_with_variants))
        .route("/variants", get(list_variants).post(create_variant))
        .route("/variants/low-stock", get(low_stock_variants))
        .route(
            "/variants/:id",
            get(get_variant).put(update_variant).delete(delete_variant),
        )
        .route("/variants/:id/product", get(get_variant_product))
}
