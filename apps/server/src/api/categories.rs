use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use pocketledger_core::categories::{Category, CategoryInput};
use serde::Deserialize;

use crate::{
    auth::AuthenticatedUser,
    error::{ApiJson, ApiQuery, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct CategoryListQuery {
    group: Option<String>,
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiQuery(query): ApiQuery<CategoryListQuery>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state
        .category_service
        .list_categories(&user.user_id, query.group.as_deref())?;
    Ok(Json(categories))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state
        .category_service
        .create_category(&user.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn rename_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<Json<Category>> {
    let category = state
        .category_service
        .rename_category(&user.user_id, &id, input)
        .await?;
    Ok(Json(category))
}

async fn delete_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<StatusCode> {
    state
        .category_service
        .delete_category(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(rename_category).delete(delete_category),
        )
}
