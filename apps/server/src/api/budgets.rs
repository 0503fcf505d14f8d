use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use pocketledger_core::budgets::{BudgetInput, BudgetProgress, BudgetSaveResult};
use serde::Deserialize;

use crate::{
    auth::AuthenticatedUser,
    error::{ApiJson, ApiQuery, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct MonthQuery {
    month: Option<String>,
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<MonthQuery>,
) -> ApiResult<Json<Vec<BudgetProgress>>> {
    let today = Utc::now().date_naive();
    let budgets =
        state
            .budget_service
            .list_budgets(&user.user_id, query.month.as_deref(), today)?;
    Ok(Json(budgets))
}

/// 201 for a new budget, 200 when the month's amount was replaced.
async fn save_budget(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<BudgetInput>,
) -> ApiResult<(StatusCode, Json<BudgetSaveResult>)> {
    let result = state.budget_service.save_budget(&user.user_id, input).await?;
    let status = if result.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(result)))
}

async fn delete_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<StatusCode> {
    state
        .budget_service
        .delete_budget(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(save_budget))
        .route("/budgets/{id}", delete(delete_budget))
}
