use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::operations::Operation;
use super::repo_types::Calculation;
use crate::validation::{optional_id, required_f64, required_str, ValidationErrors};

/// Raw body of `POST /calculations`.
#[derive(Debug, Default, Deserialize)]
pub struct CalculationPayload {
    pub operation: Option<Value>,
    pub operand_a: Option<Value>,
    pub operand_b: Option<Value>,
    pub user_id: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationCreate {
    pub operation: Operation,
    pub operand_a: f64,
    pub operand_b: f64,
    /// Absent means "take it from the `user-id` header".
    pub user_id: Option<i64>,
}

impl CalculationPayload {
    pub fn validate(&self) -> Result<CalculationCreate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let operation = match required_str(&mut errors, "operation", &self.operation) {
            Some(name) => match name.parse::<Operation>() {
                Ok(op) => Some(op),
                Err(_) => {
                    errors.add("operation", "must be one of add, subtract, multiply, divide");
                    None
                }
            },
            None => None,
        };
        let operand_a = required_f64(&mut errors, "operand_a", &self.operand_a);
        let operand_b = required_f64(&mut errors, "operand_b", &self.operand_b);
        let user_id = optional_id(&mut errors, "user_id", &self.user_id);

        match (operation, operand_a, operand_b) {
            (Some(operation), Some(operand_a), Some(operand_b)) => errors.finish(|| CalculationCreate {
                operation,
                operand_a,
                operand_b,
                user_id,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw body of `POST /add`, `/subtract`, `/multiply`, `/divide`.
#[derive(Debug, Default, Deserialize)]
pub struct OperationPayload {
    pub a: Option<Value>,
    pub b: Option<Value>,
    pub user_id: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationRequest {
    pub a: f64,
    pub b: f64,
    pub user_id: Option<i64>,
}

impl OperationPayload {
    pub fn validate(&self) -> Result<OperationRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let a = required_f64(&mut errors, "a", &self.a);
        let b = required_f64(&mut errors, "b", &self.b);
        let user_id = optional_id(&mut errors, "user_id", &self.user_id);
        match (a, b) {
            (Some(a), Some(b)) => errors.finish(|| OperationRequest { a, b, user_id }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub result: f64,
}

#[derive(Debug, Serialize)]
pub struct CalculationRead {
    pub id: i64,
    pub operation: Operation,
    pub operand_a: f64,
    pub operand_b: f64,
    pub result: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub user_id: i64,
}

impl From<Calculation> for CalculationRead {
    fn from(c: Calculation) -> Self {
        Self {
            id: c.id,
            operation: c.operation,
            operand_a: c.operand_a,
            operand_b: c.operand_b,
            result: c.result,
            timestamp: c.timestamp,
            user_id: c.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calc(body: Value) -> Result<CalculationCreate, ValidationErrors> {
        serde_json::from_value::<CalculationPayload>(body).unwrap().validate()
    }

    #[test]
    fn accepts_valid_calculation() {
        let c = calc(json!({"operation": "add", "operand_a": 10.0, "operand_b": 5, "user_id": 1}))
            .unwrap();
        assert_eq!(c.operation, Operation::Add);
        assert_eq!(c.operand_a, 10.0);
        assert_eq!(c.operand_b, 5.0);
        assert_eq!(c.user_id, Some(1));
    }

    #[test]
    fn user_id_is_optional_in_body() {
        let c = calc(json!({"operation": "divide", "operand_a": 1, "operand_b": 2})).unwrap();
        assert_eq!(c.user_id, None);
    }

    #[test]
    fn rejects_unknown_operation() {
        let err = calc(json!({"operation": "power", "operand_a": 1, "operand_b": 2})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "operation: must be one of add, subtract, multiply, divide"
        );
    }

    #[test]
    fn rejects_non_numeric_operands_and_ids() {
        let err = calc(json!({"operation": "subtract", "operand_a": "invalid", "operand_b": 5}))
            .unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), ["operand_a"]);

        let err = calc(json!({"operation": "multiply", "operand_a": 1, "operand_b": "invalid"}))
            .unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), ["operand_b"]);

        let err = calc(json!({"operation": "divide", "operand_a": 1, "operand_b": 5, "user_id": "invalid"}))
            .unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), ["user_id"]);
    }

    #[test]
    fn operation_request_requires_both_operands() {
        let p: OperationPayload = serde_json::from_value(json!({"a": 10})).unwrap();
        assert_eq!(p.validate().unwrap_err().to_string(), "b: field required");

        let p: OperationPayload = serde_json::from_value(json!({"a": 10, "b": 0})).unwrap();
        assert_eq!(
            p.validate().unwrap(),
            OperationRequest { a: 10.0, b: 0.0, user_id: None }
        );
    }
}
