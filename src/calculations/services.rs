use tracing::{info, warn};

use super::dto::OperationRequest;
use super::operations::Operation;
use super::repo_types::{Calculation, NewCalculation};
use crate::error::ApiResult;
use crate::state::AppState;
use crate::users::services::require_user;

/// Resolve the owner, compute, then persist. A division by zero writes nothing.
pub async fn record_calculation(
    state: &AppState,
    user_id: i64,
    operation: Operation,
    operand_a: f64,
    operand_b: f64,
) -> ApiResult<Calculation> {
    require_user(state, user_id).await?;

    let result = operation.apply(operand_a, operand_b).map_err(|e| {
        warn!(%operation, operand_a, operand_b, error = %e, "arithmetic rejected");
        e
    })?;

    let calc = state
        .store
        .insert_calculation(NewCalculation {
            operation,
            operand_a,
            operand_b,
            result,
            user_id,
        })
        .await?;

    info!(calculation_id = calc.id, user_id, %operation, "calculation recorded");
    Ok(calc)
}

/// Backs the single-operation endpoints: recorded when a user is named,
/// computed only otherwise.
pub async fn evaluate(
    state: &AppState,
    operation: Operation,
    req: OperationRequest,
) -> ApiResult<f64> {
    match req.user_id {
        Some(user_id) => record_calculation(state, user_id, operation, req.a, req.b)
            .await
            .map(|c| c.result),
        None => operation.apply(req.a, req.b).map_err(|e| {
            warn!(%operation, a = req.a, b = req.b, error = %e, "arithmetic rejected");
            e.into()
        }),
    }
}
