use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use pocketledger_core::transactions::{
    Transaction, TransactionInput, TransactionListParams, TransactionPage,
};

use crate::{
    auth::AuthenticatedUser,
    error::{ApiJson, ApiQuery, ApiResult},
    main_lib::AppState,
};

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiQuery(params): ApiQuery<TransactionListParams>,
) -> ApiResult<Json<TransactionPage>> {
    let query = params.into_query()?;
    let page = state
        .transaction_service
        .list_transactions(&user.user_id, query)?;
    Ok(Json(page))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<TransactionInput>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let created = state
        .transaction_service
        .create_transaction(&user.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<Transaction>> {
    let transaction = state
        .transaction_service
        .get_transaction(&user.user_id, &id)?;
    Ok(Json(transaction))
}

async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<TransactionInput>,
) -> ApiResult<Json<Transaction>> {
    let updated = state
        .transaction_service
        .update_transaction(&user.user_id, &id, input)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<StatusCode> {
    state
        .transaction_service
        .delete_transaction(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
