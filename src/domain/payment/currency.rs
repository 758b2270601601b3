//! ISO 4217 currency code value object.

use serde::Serialize;
use std::fmt;

use super::PaymentRequestError;

/// A three-letter currency code, stored lowercase as Stripe expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Parses a code, trimming whitespace and lowercasing.
    pub fn parse(code: &str) -> Result<Self, PaymentRequestError> {
        let code = code.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PaymentRequestError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_is_lowercased() {
        assert_eq!(Currency::parse("CZK").unwrap().as_str(), "czk");
        assert_eq!(Currency::parse(" Eur ").unwrap().as_str(), "eur");
    }

    #[test]
    fn currency_rejects_bad_codes() {
        for code in ["", "cz", "euro", "c2k", "€ur"] {
            assert!(
                matches!(
                    Currency::parse(code),
                    Err(PaymentRequestError::InvalidCurrency(_))
                ),
                "accepted {:?}",
                code
            );
        }
    }
}
