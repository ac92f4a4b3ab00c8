//! Demo checkout form.
//!
//! Nothing is charged. The card number is checked for shape (digits, length,
//! Luhn) and only the last four digits are kept.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{FormError, required};
use crate::types::Email;

const MAX_NAME: usize = 100;
const MAX_ADDRESS: usize = 200;
const MAX_CITY: usize = 100;

/// Raw checkout fields as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutFormInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
}

/// Card expiry month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardExpiry {
    pub month: u32,
    pub year: i32,
}

impl CardExpiry {
    /// Parse `MM/YY` (two-digit year, 2000s).
    ///
    /// # Errors
    ///
    /// [`FormError::ExpiryFormat`] for anything else.
    pub fn parse(value: &str) -> Result<Self, FormError> {
        let (month, year) = value
            .trim()
            .split_once('/')
            .ok_or(FormError::ExpiryFormat)?;
        let (month, year) = (month.trim(), year.trim());
        if month.len() != 2 || year.len() != 2 {
            return Err(FormError::ExpiryFormat);
        }
        let month: u32 = month.parse().map_err(|_| FormError::ExpiryFormat)?;
        let year: i32 = year.parse().map_err(|_| FormError::ExpiryFormat)?;
        if !(1..=12).contains(&month) {
            return Err(FormError::ExpiryFormat);
        }
        Ok(Self {
            month,
            year: 2000 + year,
        })
    }

    /// Cards are valid through the end of their expiry month.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }
}

/// Validated checkout submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutForm {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub card_last4: String,
    pub expiry: CardExpiry,
}

impl CheckoutForm {
    /// Validate against today's date (UTC).
    ///
    /// # Errors
    ///
    /// The first [`FormError`] encountered, in field order.
    pub fn parse(input: &CheckoutFormInput) -> Result<Self, FormError> {
        Self::parse_on(input, Utc::now().date_naive())
    }

    /// Validate against an explicit date.
    ///
    /// # Errors
    ///
    /// The first [`FormError`] encountered, in field order.
    pub fn parse_on(input: &CheckoutFormInput, today: NaiveDate) -> Result<Self, FormError> {
        if input.email.trim().is_empty() {
            return Err(FormError::Required("email"));
        }
        let email = Email::parse(&input.email)?;
        let first_name = required("first_name", &input.first_name, MAX_NAME)?;
        let last_name = required("last_name", &input.last_name, MAX_NAME)?;
        let address = required("address", &input.address, MAX_ADDRESS)?;
        let city = required("city", &input.city, MAX_CITY)?;
        let zip_code = parse_zip(&input.zip_code)?;
        let card_last4 = parse_card_number(&input.card_number)?;
        if input.expiry_date.trim().is_empty() {
            return Err(FormError::Required("expiry_date"));
        }
        let expiry = CardExpiry::parse(&input.expiry_date)?;
        if expiry.is_expired_on(today) {
            return Err(FormError::CardExpired);
        }
        parse_cvv(&input.cvv)?;

        Ok(Self {
            email,
            first_name,
            last_name,
            address,
            city,
            zip_code,
            card_last4,
            expiry,
        })
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn parse_zip(value: &str) -> Result<String, FormError> {
    let zip = value.trim();
    if zip.is_empty() {
        return Err(FormError::Required("zip_code"));
    }
    let valid = (3..=10).contains(&zip.len())
        && zip
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-');
    if !valid {
        return Err(FormError::ZipCode);
    }
    Ok(zip.to_owned())
}

/// Returns the last four digits.
fn parse_card_number(value: &str) -> Result<String, FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Required("card_number"));
    }
    let mut digits = Vec::with_capacity(19);
    for c in value.chars() {
        match c {
            ' ' | '-' => {}
            _ => digits.push(c.to_digit(10).ok_or(FormError::CardNumber)?),
        }
    }
    if !(12..=19).contains(&digits.len()) || !luhn_valid(&digits) {
        return Err(FormError::CardNumber);
    }
    Ok(digits
        .iter()
        .skip(digits.len() - 4)
        .map(|d| char::from_digit(*d, 10).unwrap_or('0'))
        .collect())
}

fn luhn_valid(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn parse_cvv(value: &str) -> Result<(), FormError> {
    let cvv = value.trim();
    if cvv.is_empty() {
        return Err(FormError::Required("cvv"));
    }
    if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
        return Err(FormError::Cvv);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn valid_input() -> CheckoutFormInput {
        CheckoutFormInput {
            email: "john@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            address: "123 Main St".to_string(),
            city: "New York".to_string(),
            zip_code: "10001".to_string(),
            card_number: "4242 4242 4242 4242".to_string(),
            expiry_date: "12/29".to_string(),
            cvv: "123".to_string(),
        }
    }

    #[test]
    fn test_valid_form_keeps_only_last_four() {
        let form = CheckoutForm::parse_on(&valid_input(), today()).unwrap();
        assert_eq!(form.card_last4, "4242");
        assert_eq!(form.full_name(), "John Doe");
        assert_eq!(form.expiry, CardExpiry { month: 12, year: 2029 });
    }

    #[test]
    fn test_missing_fields_report_first_in_order() {
        let err = CheckoutForm::parse_on(&CheckoutFormInput::default(), today()).unwrap_err();
        assert_eq!(err, FormError::Required("email"));

        let mut input = CheckoutFormInput {
            email: "john.example.com".to_string(),
            ..CheckoutFormInput::default()
        };
        assert!(matches!(
            CheckoutForm::parse_on(&input, today()),
            Err(FormError::Email(_))
        ));

        input.email = "john@example.com".to_string();
        assert_eq!(
            CheckoutForm::parse_on(&input, today()),
            Err(FormError::Required("first_name"))
        );

        let mut input = valid_input();
        input.city = " ".to_string();
        assert_eq!(
            CheckoutForm::parse_on(&input, today()),
            Err(FormError::Required("city"))
        );
    }

    #[test]
    fn test_bad_email() {
        let mut input = valid_input();
        input.email = "john.example.com".to_string();
        assert!(matches!(
            CheckoutForm::parse_on(&input, today()),
            Err(FormError::Email(_))
        ));
    }

    #[test]
    fn test_card_number_checks() {
        for bad in ["4242 4242 4242 4241", "4242-abcd", "4242"] {
            let mut input = valid_input();
            input.card_number = bad.to_string();
            assert_eq!(
                CheckoutForm::parse_on(&input, today()),
                Err(FormError::CardNumber),
                "{bad}"
            );
        }
        let mut input = valid_input();
        input.card_number = "5555-5555-5555-4444".to_string();
        assert_eq!(
            CheckoutForm::parse_on(&input, today()).unwrap().card_last4,
            "4444"
        );
    }

    #[test]
    fn test_expiry_checks() {
        assert_eq!(CardExpiry::parse("13/27"), Err(FormError::ExpiryFormat));
        assert_eq!(CardExpiry::parse("1/27"), Err(FormError::ExpiryFormat));
        assert_eq!(CardExpiry::parse("0127"), Err(FormError::ExpiryFormat));

        let expiry = CardExpiry::parse("10/26").unwrap();
        assert!(!expiry.is_expired_on(today()));
        let expiry = CardExpiry::parse("09/26").unwrap();
        assert!(expiry.is_expired_on(today()));

        let mut input = valid_input();
        input.expiry_date = "01/20".to_string();
        assert_eq!(
            CheckoutForm::parse_on(&input, today()),
            Err(FormError::CardExpired)
        );
    }

    #[test]
    fn test_cvv_and_zip() {
        let mut input = valid_input();
        input.cvv = "12a".to_string();
        assert_eq!(CheckoutForm::parse_on(&input, today()), Err(FormError::Cvv));

        let mut input = valid_input();
        input.zip_code = "10001!".to_string();
        assert_eq!(
            CheckoutForm::parse_on(&input, today()),
            Err(FormError::ZipCode)
        );
    }
}
