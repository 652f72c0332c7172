use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{Pagination, UserPayload, UserRead};
use super::services::{register, require_user};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserPayload>,
) -> ApiResult<(StatusCode, Json<UserRead>)> {
    let cmd = payload.validate().map_err(|e| {
        warn!(error = %e, "invalid user payload");
        e
    })?;
    let user = register(&state, cmd).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> ApiResult<Json<Vec<UserRead>>> {
    let (skip, limit) = p.validate()?;
    let users = state.store.list_users(skip, limit).await?;
    Ok(Json(users.into_iter().map(UserRead::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<UserRead>> {
    let user = require_user(&state, id).await?;
    Ok(Json(user.into()))
}
