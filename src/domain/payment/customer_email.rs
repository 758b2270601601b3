//! Customer email used for find-or-create customer lookup.

use std::fmt;

use super::PaymentRequestError;

/// A trimmed address with a non-empty local part and domain around `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    pub fn parse(raw: Option<&str>) -> Result<Self, PaymentRequestError> {
        let email = raw.map(str::trim).unwrap_or_default();
        if email.is_empty() {
            return Err(PaymentRequestError::MissingEmail);
        }

        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(email.to_string()))
            }
            _ => Err(PaymentRequestError::InvalidEmail(email.to_string())),
        }
    }

    /// Synthetic address for customers who subscribe without giving one.
    pub fn placeholder(domain: &str, unix_millis: i64) -> Self {
        Self(format!("customer_{}@{}", unix_millis, domain))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
