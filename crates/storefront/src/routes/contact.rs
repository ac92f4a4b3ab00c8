//! Contact and community form handlers.
//!
//! Submissions are validated and logged. There is no mail or CRM backend; the
//! structured log line is the record of the submission.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::instrument;
use veilbound_core::FormError;
use veilbound_core::forms::{CommunitySignup, CommunitySignupInput, ContactForm, ContactFormInput};

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl ContactResponse {
    fn accepted(message: &str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                message: Some(message.to_string()),
                field: None,
            }),
        )
    }

    fn rejected(err: &FormError) -> (StatusCode, Json<Self>) {
        (
            StatusCode::BAD_REQUEST,
            Json(Self {
                success: false,
                message: Some(err.to_string()),
                field: Some(err.field()),
            }),
        )
    }
}

/// Submit the contact form.
///
/// POST /contact
#[instrument(skip(input))]
pub async fn submit(Json(input): Json<ContactFormInput>) -> impl IntoResponse {
    let form = match ContactForm::parse(&input) {
        Ok(form) => form,
        Err(err) => return ContactResponse::rejected(&err),
    };

    tracing::info!(
        name = %form.name,
        email = %form.email,
        message_len = form.message.len(),
        "Contact message received"
    );

    ContactResponse::accepted("Thanks for reaching out. We'll get back to you soon.")
}

/// Join the community list.
///
/// POST /community/join
#[instrument(skip(input))]
pub async fn join(Json(input): Json<CommunitySignupInput>) -> impl IntoResponse {
    let signup = match CommunitySignup::parse(&input) {
        Ok(signup) => signup,
        Err(err) => return ContactResponse::rejected(&err),
    };

    tracing::info!(
        name = %signup.name,
        email = %signup.email,
        has_phone = signup.phone.is_some(),
        contact_method = signup.contact_method.map(|m| m.as_str()),
        interest = signup.interest.map(|i| i.as_str()),
        "Community signup received"
    );

    ContactResponse::accepted("Welcome to the Veilbound community!")
}
