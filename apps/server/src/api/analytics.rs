use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use pocketledger_core::analytics::{AnalyticsParams, DashboardSummary, InvestmentSummary};

use crate::{
    auth::AuthenticatedUser,
    error::{ApiQuery, ApiResult},
    main_lib::AppState,
};

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiQuery(params): ApiQuery<AnalyticsParams>,
) -> ApiResult<Json<DashboardSummary>> {
    let query = params.into_query()?;
    let today = Utc::now().date_naive();
    let summary = state
        .analytics_service
        .dashboard(&user.user_id, &query, today)?;
    Ok(Json(summary))
}

async fn get_investments(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiQuery(params): ApiQuery<AnalyticsParams>,
) -> ApiResult<Json<InvestmentSummary>> {
    let query = params.into_investment_query()?;
    let today = Utc::now().date_naive();
    let summary = state
        .analytics_service
        .investments(&user.user_id, &query, today)?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analytics", get(get_dashboard))
        .route("/investments", get(get_investments))
}
