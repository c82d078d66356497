//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure of the order lifecycle surfaces as one of these kinds. Errors
/// are never retried internally; callers receive them verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input (empty names, non-positive ids or
    /// quantities, returning more than an order holds).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced product or order does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Requested quantity exceeds the stock currently available.
    #[error("not enough stock for product {product_id} (requested: {requested}, available: {available})")]
    NotEnoughStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The order's status does not permit the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<i64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn not_enough_stock(product_id: ProductId, requested: i64, available: i64) -> Self {
        Self::NotEnoughStock {
            product_id,
            requested,
            available,
        }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Response class a request layer should map this error to.
    pub fn class(&self) -> ErrorClass {
        match self {
            DomainError::InvalidInput(_) | DomainError::NotEnoughStock { .. } => {
                ErrorClass::BadRequest
            }
            DomainError::NotFound { .. } => ErrorClass::NotFound,
            DomainError::InvalidState(_) => ErrorClass::Conflict,
        }
    }
}

/// Transport-agnostic error class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    BadRequest,
    NotFound,
    Conflict,
}

impl ErrorClass {
    /// HTTP status code conventionally used for this class.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorClass::BadRequest => 400,
            ErrorClass::NotFound => 404,
            ErrorClass::Conflict => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_map_to_expected_status_codes() {
        assert_eq!(DomainError::invalid_input("x").class().status_code(), 400);
        assert_eq!(
            DomainError::not_enough_stock(ProductId(1), 2, 1)
                .class()
                .status_code(),
            400
        );
        assert_eq!(DomainError::not_found("order", 7).class().status_code(), 404);
        assert_eq!(DomainError::invalid_state("x").class().status_code(), 409);
    }

    #[test]
    fn messages_carry_context() {
        let err = DomainError::not_enough_stock(ProductId(3), 5, 2);
        assert_eq!(
            err.to_string(),
            "not enough stock for product 3 (requested: 5, available: 2)"
        );
        assert_eq!(
            DomainError::not_found("product", ProductId(9)).to_string(),
            "product 9 not found"
        );
    }
}
