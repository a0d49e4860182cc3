use super::common::success_response;
use crate::{errors::ServiceError, services::reports::ReportQuery, AppState};
use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

async fn daily_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ServiceError> {
    let date = query.resolve_date()?;
    Ok(success_response(
        state.services.reports.daily_summary(date).await?,
    ))
}

async fn qb_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ServiceError> {
    let date = query.resolve_date()?;
    Ok(success_response(state.services.reports.qb_summary(date).await?))
}

pub fn report_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/report/daily-summary", get(daily_summary))
        .route("/report/qb-summary", get(qb_summary))
}
