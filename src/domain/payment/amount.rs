//! Charge amount value object (minor currency units).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PaymentRequestError;

/// An amount in the smallest currency unit, at least [`Amount::MIN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Smallest chargeable amount (1.00 in a two-decimal currency).
    pub const MIN: i64 = 100;

    /// Creates an Amount, returning error if below the minimum.
    pub fn try_new(minor_units: i64) -> Result<Self, PaymentRequestError> {
        if minor_units < Self::MIN {
            return Err(PaymentRequestError::AmountTooSmall {
                min: Self::MIN,
                actual: minor_units,
            });
        }
        Ok(Self(minor_units))
    }

    /// Returns the value in minor units.
    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_minimum_and_above() {
        assert_eq!(Amount::try_new(100).unwrap().minor_units(), 100);
        assert_eq!(Amount::try_new(149_900).unwrap().minor_units(), 149_900);
    }

    #[test]
    fn amount_rejects_below_minimum() {
        assert_eq!(
            Amount::try_new(99),
            Err(PaymentRequestError::AmountTooSmall {
                min: 100,
                actual: 99
            })
        );
        assert!(Amount::try_new(0).is_err());
        assert!(Amount::try_new(-500).is_err());
    }

    #[test]
    fn amount_serializes_as_plain_number() {
        let json = serde_json::to_string(&Amount::try_new(2500).unwrap()).unwrap();
        assert_eq!(json, "2500");
    }
}
