use std::sync::Arc;

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use pocketledger_core::users::UserUpdate;
use serde_json::json;

use crate::{
    auth::{AuthenticatedUser, MeResponse, UserResponse},
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

async fn get_profile(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Json<MeResponse>> {
    let user = state.user_service.get_user(&user.user_id)?;
    Ok(Json(MeResponse { user }))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ApiJson(update): ApiJson<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_profile(&user.user_id, update)
        .await?;
    Ok(Json(UserResponse {
        message: "Profile updated".to_string(),
        user,
    }))
}

/// Removes the account with everything it owns and ends the session.
async fn delete_profile(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Response> {
    state.user_service.delete_account(&user.user_id).await?;
    Ok((
        [(SET_COOKIE, state.auth.cleared_cookie())],
        Json(json!({ "message": "Account deleted" })),
    )
        .into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/user/profile",
        get(get_profile).put(update_profile).delete(delete_profile),
    )
}
