use sqlx::FromRow;
use time::OffsetDateTime;

use super::operations::{Operation, UnknownOperation};

#[derive(Debug, FromRow)]
pub struct CalculationRow {
    pub id: i64,
    pub operation: String,
    pub operand_a: f64,
    pub operand_b: f64,
    pub result: f64,
    pub timestamp: OffsetDateTime,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub id: i64,
    pub operation: Operation,
    pub operand_a: f64,
    pub operand_b: f64,
    pub result: f64,
    pub timestamp: OffsetDateTime,
    pub user_id: i64,
}

impl TryFrom<CalculationRow> for Calculation {
    type Error = UnknownOperation;

    fn try_from(r: CalculationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            operation: r.operation.parse()?,
            operand_a: r.operand_a,
            operand_b: r.operand_b,
            result: r.result,
            timestamp: r.timestamp,
            user_id: r.user_id,
        })
    }
}

/// A computed calculation waiting to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalculation {
    pub operation: Operation,
    pub operand_a: f64,
    pub operand_b: f64,
    pub result: f64,
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(operation: &str) -> CalculationRow {
        CalculationRow {
            id: 1,
            operation: operation.into(),
            operand_a: 4.0,
            operand_b: 2.0,
            result: 2.0,
            timestamp: OffsetDateTime::UNIX_EPOCH,
            user_id: 9,
        }
    }

    #[test]
    fn row_converts_known_operation() {
        let calc = Calculation::try_from(row("divide")).unwrap();
        assert_eq!(calc.operation, Operation::Divide);
        assert_eq!(calc.user_id, 9);
    }

    #[test]
    fn row_rejects_unknown_operation() {
        let err = Calculation::try_from(row("modulo")).unwrap_err();
        assert_eq!(err.to_string(), "unknown operation `modulo`");
    }
}
