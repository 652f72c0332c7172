use sqlx::PgExecutor;

use super::repo_types::{CalculationRow, NewCalculation};

pub async fn find_by_id<'e>(
    db: impl PgExecutor<'e>,
    id: i64,
) -> sqlx::Result<Option<CalculationRow>> {
    sqlx::query_as::<_, CalculationRow>(
        r#"
        SELECT id, operation, operand_a, operand_b, result, timestamp, user_id
        FROM calculations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn list_by_user<'e>(
    db: impl PgExecutor<'e>,
    user_id: i64,
    skip: i64,
    limit: i64,
) -> sqlx::Result<Vec<CalculationRow>> {
    sqlx::query_as::<_, CalculationRow>(
        r#"
        SELECT id, operation, operand_a, operand_b, result, timestamp, user_id
        FROM calculations
        WHERE user_id = $1
        ORDER BY id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(db)
    .await
}

pub async fn insert<'e>(
    db: impl PgExecutor<'e>,
    new: &NewCalculation,
) -> sqlx::Result<CalculationRow> {
    sqlx::query_as::<_, CalculationRow>(
        r#"
        INSERT INTO calculations (operation, operand_a, operand_b, result, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, operation, operand_a, operand_b, result, timestamp, user_id
        "#,
    )
    .bind(new.operation.as_str())
    .bind(new.operand_a)
    .bind(new.operand_b)
    .bind(new.result)
    .bind(new.user_id)
    .fetch_one(db)
    .await
}
