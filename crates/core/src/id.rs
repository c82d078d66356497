//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are assigned by the stores, starting at 1. Values supplied by
//! callers are not trusted: construction never fails, and operations reject
//! non-positive ids with [`DomainError::InvalidInput`].

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

/// Identifier of an order record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub fn get(self) -> i64 {
                self.0
            }

            /// Store-assigned identifiers are always positive.
            pub fn is_valid(self) -> bool {
                self.0 > 0
            }

            /// Reject non-positive identifiers as invalid input.
            pub fn validate(self) -> Result<Self, DomainError> {
                if self.is_valid() {
                    Ok(self)
                } else {
                    Err(DomainError::invalid_input(format!(
                        "{} must be positive (got {})",
                        $name, self.0
                    )))
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = i64::from_str(s.trim())
                    .map_err(|e| DomainError::invalid_input(format!("{}: {}", $name, e)))?;
                Self(raw).validate()
            }
        }
    };
}

impl_int_newtype!(ProductId, "ProductId");
impl_int_newtype!(OrderId, "OrderId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids() {
        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId(42));
        assert_eq!(" 7 ".parse::<OrderId>().unwrap(), OrderId(7));
    }

    #[test]
    fn rejects_non_positive_and_garbage() {
        assert!(matches!(
            "0".parse::<OrderId>(),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            "-3".parse::<ProductId>(),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            "abc".parse::<ProductId>(),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn serializes_transparently() {
        assert_eq!(serde_json::to_string(&OrderId(5)).unwrap(), "5");
        let id: ProductId = serde_json::from_str("12").unwrap();
        assert_eq!(id, ProductId(12));
    }
}
