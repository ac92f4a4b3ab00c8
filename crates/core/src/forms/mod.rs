//! Typed form records.
//!
//! Each form has a raw `*Input` struct (all strings, deserialized straight
//! from the request body) and a validated record built with `parse`. Handlers
//! only ever work with the validated record.

mod checkout;
mod community;

pub use checkout::{CardExpiry, CheckoutForm, CheckoutFormInput};
pub use community::{
    CommunitySignup, CommunitySignupInput, ContactForm, ContactFormInput, ContactMethod, Interest,
};

use thiserror::Error;

use crate::types::EmailError;

/// A field failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
    #[error("card number is invalid")]
    CardNumber,
    #[error("expiry date must be MM/YY")]
    ExpiryFormat,
    #[error("card has expired")]
    CardExpired,
    #[error("CVV must be 3 or 4 digits")]
    Cvv,
    #[error("ZIP code is invalid")]
    ZipCode,
    #[error("phone number is invalid")]
    Phone,
    #[error("unknown {field}: {value}")]
    UnknownChoice { field: &'static str, value: String },
}

impl FormError {
    /// Name of the offending field, for highlighting in the UI.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match *self {
            Self::Required(field)
            | Self::TooLong { field, .. }
            | Self::UnknownChoice { field, .. } => field,
            Self::Email(_) => "email",
            Self::CardNumber => "card_number",
            Self::ExpiryFormat | Self::CardExpired => "expiry_date",
            Self::Cvv => "cvv",
            Self::ZipCode => "zip_code",
            Self::Phone => "phone",
        }
    }
}

/// Trim and require a non-empty value no longer than `max` characters.
fn required(field: &'static str, value: &str, max: usize) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    bounded(field, trimmed, max)
}

/// Trim an optional value; blank becomes `None`.
fn optional(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, FormError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => bounded(field, trimmed, max).map(Some),
    }
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, FormError> {
    if value.chars().count() > max {
        return Err(FormError::TooLong { field, max });
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Ada ", 10), Ok("Ada".to_string()));
        assert_eq!(required("name", "   ", 10), Err(FormError::Required("name")));
        assert_eq!(
            required("name", "abcdefghijk", 10),
            Err(FormError::TooLong {
                field: "name",
                max: 10
            })
        );
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("phone", Some("  "), 5), Ok(None));
        assert_eq!(optional("phone", None, 5), Ok(None));
        assert_eq!(optional("phone", Some(" 123 "), 5), Ok(Some("123".to_string())));
    }

    #[test]
    fn test_error_fields() {
        assert_eq!(FormError::CardExpired.field(), "expiry_date");
        assert_eq!(FormError::Required("city").field(), "city");
    }
}
