use super::common::{created_response, paginated_response, success_response};
use crate::{
    errors::ServiceError,
    services::{
        invoices::{CreateInvoiceInput, UpdateInvoiceInput},
        quotations::{
            parse_status, CreateQuotationInput, UpdateQuotationInput, UpdateQuotationStatusInput,
        },
        ListQuery,
    },
    validation::ValidatedJson,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

async fn list_quotations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.quotations.list(&query).await?))
}

async fn get_quotation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.quotations.get(id).await?))
}

async fn get_quotation_items(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(
        state.services.quotations.get_with_items(id).await?,
    ))
}

async fn create_quotation(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateQuotationInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.quotations.create(input).await?))
}

async fn update_quotation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateQuotationInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(
        state.services.quotations.update(id, input).await?,
    ))
}

async fn update_quotation_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateQuotationStatusInput>,
) -> Result<Response, ServiceError> {
    let status = parse_status(&input.status)?;
    Ok(success_response(
        state.services.quotations.update_status(id, status).await?,
    ))
}

async fn delete_quotation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.quotations.delete(id).await?))
}

async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    Ok(paginated_response(state.services.invoices.list(&query).await?))
}

async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.invoices.get(id).await?))
}

async fn create_invoice(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CreateInvoiceInput>,
) -> Result<Response, ServiceError> {
    Ok(created_response(state.services.invoices.create(input).await?))
}

async fn update_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<UpdateInvoiceInput>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.invoices.update(id, input).await?))
}

async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ServiceError> {
    Ok(success_response(state.services.invoices.delete(id).await?))
}

pub fn quotation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotations", get(list_quotations).post(create_quotation))
        .route(
            "/quotations/:id",
            get(get_quotation)
                .put(update_quotation)
                .delete(delete_quotation),
        )
        .route("/quotations/:id/items", get(get_quotation_items))
        .route("/quotations/:id/status", put(update_quotation_status))
}

pub fn invoice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/invoices/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
}
