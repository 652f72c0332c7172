use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{CalculationPayload, CalculationRead, OperationPayload, OperationResponse};
use super::operations::Operation;
use super::services::{evaluate, record_calculation};
use crate::error::{ApiError, ApiResult, CALCULATION_NOT_FOUND};
use crate::extract::{ApiJson, ApiPath, ApiQuery, UserIdHeader, USER_ID_HEADER};
use crate::state::AppState;
use crate::users::dto::Pagination;
use crate::users::services::require_user;
use crate::validation::ValidationErrors;

pub fn calculation_routes() -> Router<AppState> {
    Router::new()
        .route("/calculations", get(list_calculations).post(create_calculation))
        .route("/calculations/:id", get(get_calculation))
        .route("/users/:id/calculations", get(list_user_calculations))
}

pub fn operation_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_route))
        .route("/subtract", post(subtract_route))
        .route("/multiply", post(multiply_route))
        .route("/divide", post(divide_route))
}

#[instrument(skip(state, payload))]
pub async fn create_calculation(
    State(state): State<AppState>,
    header: UserIdHeader,
    ApiJson(payload): ApiJson<CalculationPayload>,
) -> ApiResult<(StatusCode, Json<CalculationRead>)> {
    let cmd = payload.validate().map_err(|e| {
        warn!(error = %e, "invalid calculation payload");
        e
    })?;
    let user_id = header
        .or_body(cmd.user_id)?
        .ok_or_else(|| ValidationErrors::single("user_id", "field required"))?;

    let calc = record_calculation(&state, user_id, cmd.operation, cmd.operand_a, cmd.operand_b)
        .await?;
    Ok((StatusCode::CREATED, Json(calc.into())))
}

#[instrument(skip(state))]
pub async fn get_calculation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<CalculationRead>> {
    match state.store.find_calculation(id).await? {
        Some(calc) => Ok(Json(calc.into())),
        None => {
            warn!(calculation_id = id, "calculation not found");
            Err(ApiError::NotFound(CALCULATION_NOT_FOUND))
        }
    }
}

/// `GET /calculations` with the owner in the `user-id` header.
#[instrument(skip(state))]
pub async fn list_calculations(
    State(state): State<AppState>,
    header: UserIdHeader,
    ApiQuery(p): ApiQuery<Pagination>,
) -> ApiResult<Json<Vec<CalculationRead>>> {
    let user_id = header
        .get()?
        .ok_or_else(|| ValidationErrors::single(USER_ID_HEADER, "header required"))?;
    calculations_of(&state, user_id, p).await
}

#[instrument(skip(state))]
pub async fn list_user_calculations(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(p): ApiQuery<Pagination>,
) -> ApiResult<Json<Vec<CalculationRead>>> {
    calculations_of(&state, user_id, p).await
}

async fn calculations_of(
    state: &AppState,
    user_id: i64,
    p: Pagination,
) -> ApiResult<Json<Vec<CalculationRead>>> {
    let (skip, limit) = p.validate()?;
    require_user(state, user_id).await?;
    let calcs = state
        .store
        .list_calculations_for_user(user_id, skip, limit)
        .await?;
    Ok(Json(calcs.into_iter().map(CalculationRead::from).collect()))
}

async fn run_operation(
    state: AppState,
    operation: Operation,
    header: UserIdHeader,
    payload: OperationPayload,
) -> ApiResult<Json<OperationResponse>> {
    let mut req = payload.validate().map_err(|e| {
        warn!(%operation, error = %e, "invalid operation payload");
        e
    })?;
    req.user_id = header.or_body(req.user_id)?;
    let result = evaluate(&state, operation, req).await?;
    Ok(Json(OperationResponse { result }))
}

#[instrument(skip(state, payload))]
pub async fn add_route(
    State(state): State<AppState>,
    header: UserIdHeader,
    ApiJson(payload): ApiJson<OperationPayload>,
) -> ApiResult<Json<OperationResponse>> {
    run_operation(state, Operation::Add, header, payload).await
}

#[instrument(skip(state, payload))]
pub async fn subtract_route(
    State(state): State<AppState>,
    header: UserIdHeader,
    ApiJson(payload): ApiJson<OperationPayload>,
) -> ApiResult<Json<OperationResponse>> {
    run_operation(state, Operation::Subtract, header, payload).await
}

#[instrument(skip(state, payload))]
pub async fn multiply_route(
    State(state): State<AppState>,
    header: UserIdHeader,
    ApiJson(payload): ApiJson<OperationPayload>,
) -> ApiResult<Json<OperationResponse>> {
    run_operation(state, Operation::Multiply, header, payload).await
}

#[instrument(skip(state, payload))]
pub async fn divide_route(
    State(state): State<AppState>,
    header: UserIdHeader,
    ApiJson(payload): ApiJson<OperationPayload>,
) -> ApiResult<Json<OperationResponse>> {
    run_operation(state, Operation::Divide, header, payload).await
}
