use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use pocketledger_core::stocks::{
    Holding, PriceRefreshResult, StockLot, StockLotInput, StockSaveResult,
};
use serde::Serialize;

use crate::{
    auth::AuthenticatedUser,
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

async fn list_stocks(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Vec<StockLot>>> {
    let stocks = state.stock_service.list_stocks(&user.user_id)?;
    Ok(Json(stocks))
}

#[derive(Serialize)]
struct StockSaveResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(flatten)]
    result: StockSaveResult,
}

/// 201 for a new lot, 200 when a buy was averaged into an existing one.
async fn save_stock(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<StockLotInput>,
) -> ApiResult<(StatusCode, Json<StockSaveResponse>)> {
    let result = state.stock_service.save_stock(&user.user_id, input).await?;
    let status = if result.averaged {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(StockSaveResponse {
            message: result.message(),
            result,
        }),
    ))
}

async fn update_stock(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<StockLotInput>,
) -> ApiResult<Json<StockLot>> {
    let stock = state
        .stock_service
        .update_stock(&user.user_id, &id, input)
        .await?;
    Ok(Json(stock))
}

async fn delete_stock(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<StatusCode> {
    state.stock_service.delete_stock(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_holdings(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Vec<Holding>>> {
    let holdings = state.stock_service.get_holdings(&user.user_id)?;
    Ok(Json(holdings))
}

async fn refresh_prices(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<PriceRefreshResult>> {
    let result = state.stock_service.refresh_prices(&user.user_id).await?;
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks", get(list_stocks).post(save_stock))
        .route("/stocks/holdings", get(get_holdings))
        .route("/stocks/refresh-prices", post(refresh_prices))
        .route("/stocks/{id}", put(update_stock).delete(delete_stock))
}
