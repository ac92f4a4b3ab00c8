//! Contact and community signup forms.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{FormError, optional, required};
use crate::types::Email;

const MAX_NAME: usize = 100;
const MAX_MESSAGE: usize = 5000;
const MAX_PHONE: usize = 20;

/// Raw contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFormInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Validated contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: Email,
    pub message: String,
}

impl ContactForm {
    /// # Errors
    ///
    /// The first [`FormError`] encountered.
    pub fn parse(input: &ContactFormInput) -> Result<Self, FormError> {
        let name = required("name", &input.name, MAX_NAME)?;
        if input.email.trim().is_empty() {
            return Err(FormError::Required("email"));
        }
        let email = Email::parse(&input.email)?;
        let message = required("message", &input.message, MAX_MESSAGE)?;
        Ok(Self {
            name,
            email,
            message,
        })
    }
}

/// Preferred way to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactMethod {
    Email,
    Phone,
    Discord,
    NewsletterOnly,
}

impl ContactMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Discord => "discord",
            Self::NewsletterOnly => "newsletter",
        }
    }
}

impl FromStr for ContactMethod {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "discord" => Ok(Self::Discord),
            "newsletter" => Ok(Self::NewsletterOnly),
            other => Err(FormError::UnknownChoice {
                field: "contact_method",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a community member is most interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interest {
    AlphaTesting,
    DevelopmentUpdates,
    CommunityEvents,
    LoreWorldbuilding,
    GameplayMechanics,
    EarlyAccess,
}

impl Interest {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlphaTesting => "alpha-testing",
            Self::DevelopmentUpdates => "development-updates",
            Self::CommunityEvents => "community-events",
            Self::LoreWorldbuilding => "lore-worldbuilding",
            Self::GameplayMechanics => "gameplay-mechanics",
            Self::EarlyAccess => "early-access",
        }
    }
}

impl FromStr for Interest {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha-testing" => Ok(Self::AlphaTesting),
            "development-updates" => Ok(Self::DevelopmentUpdates),
            "community-events" => Ok(Self::CommunityEvents),
            "lore-worldbuilding" => Ok(Self::LoreWorldbuilding),
            "gameplay-mechanics" => Ok(Self::GameplayMechanics),
            "early-access" => Ok(Self::EarlyAccess),
            other => Err(FormError::UnknownChoice {
                field: "interest",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw community signup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunitySignupInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub contact_method: Option<String>,
    #[serde(default)]
    pub interest: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Validated community signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunitySignup {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub contact_method: Option<ContactMethod>,
    pub interest: Option<Interest>,
    pub message: Option<String>,
}

impl CommunitySignup {
    /// # Errors
    ///
    /// The first [`FormError`] encountered.
    pub fn parse(input: &CommunitySignupInput) -> Result<Self, FormError> {
        let name = required("name", &input.name, MAX_NAME)?;
        if input.email.trim().is_empty() {
            return Err(FormError::Required("email"));
        }
        let email = Email::parse(&input.email)?;
        let phone = optional("phone", input.phone.as_deref(), MAX_PHONE)?;
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }
        let contact_method = optional("contact_method", input.contact_method.as_deref(), 32)?
            .map(|value| value.parse::<ContactMethod>())
            .transpose()?;
        if contact_method == Some(ContactMethod::Phone) && phone.is_none() {
            return Err(FormError::Required("phone"));
        }
        let interest = optional("interest", input.interest.as_deref(), 32)?
            .map(|value| value.parse::<Interest>())
            .transpose()?;
        let message = optional("message", input.message.as_deref(), MAX_MESSAGE)?;

        Ok(Self {
            name,
            email,
            phone,
            contact_method,
            interest,
            message,
        })
    }
}

fn validate_phone(phone: &str) -> Result<(), FormError> {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !allowed || digits < 7 {
        return Err(FormError::Phone);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_form() {
        let form = ContactForm::parse(&ContactFormInput {
            name: " Ada ".to_string(),
            email: "Ada@Example.com".to_string(),
            message: "Is there a Linux build?".to_string(),
        })
        .unwrap();
        assert_eq!(form.name, "Ada");
        assert_eq!(form.email.as_str(), "ada@example.com");

        let err = ContactForm::parse(&ContactFormInput {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: String::new(),
        })
        .unwrap_err();
        assert_eq!(err, FormError::Required("message"));
    }

    #[test]
    fn test_signup_minimal() {
        let signup = CommunitySignup::parse(&CommunitySignupInput {
            name: "Explorer".to_string(),
            email: "explorer@veilbound.game".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(signup.phone, None);
        assert_eq!(signup.contact_method, None);
        assert_eq!(signup.interest, None);
    }

    #[test]
    fn test_signup_choices() {
        let signup = CommunitySignup::parse(&CommunitySignupInput {
            name: "Explorer".to_string(),
            email: "explorer@veilbound.game".to_string(),
            phone: Some("+1 (555) 010-2000".to_string()),
            contact_method: Some("phone".to_string()),
            interest: Some("lore-worldbuilding".to_string()),
            message: Some("  ".to_string()),
        })
        .unwrap();
        assert_eq!(signup.contact_method, Some(ContactMethod::Phone));
        assert_eq!(signup.interest, Some(Interest::LoreWorldbuilding));
        assert_eq!(signup.message, None);
    }

    #[test]
    fn test_signup_rejects_unknown_choice_and_bad_phone() {
        let base = CommunitySignupInput {
            name: "Explorer".to_string(),
            email: "explorer@veilbound.game".to_string(),
            ..Default::default()
        };

        let err = CommunitySignup::parse(&CommunitySignupInput {
            interest: Some("speedrunning".to_string()),
            ..base.clone()
        })
        .unwrap_err();
        assert_eq!(err.field(), "interest");

        let err = CommunitySignup::parse(&CommunitySignupInput {
            phone: Some("call me".to_string()),
            ..base.clone()
        })
        .unwrap_err();
        assert_eq!(err, FormError::Phone);

        let err = CommunitySignup::parse(&CommunitySignupInput {
            contact_method: Some("phone".to_string()),
            ..base
        })
        .unwrap_err();
        assert_eq!(err, FormError::Required("phone"));
    }
}
