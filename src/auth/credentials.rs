//! Input validation for login and signup.
//!
//! Both gateways run these checks before doing anything else, so a caller
//! sees the same validation messages whichever backend is wired in.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::auth::AuthError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

const REQUIRED: &str = "required";

#[derive(Debug, Validate)]
struct LoginForm {
    #[validate(length(min = 1, code = "required", message = "Email and password are required"))]
    email: String,
    #[validate(length(min = 1, code = "required", message = "Email and password are required"))]
    password: String,
}

#[derive(Debug, Validate)]
struct SignupForm {
    #[validate(length(min = 1, code = "required", message = "All fields are required"))]
    name: String,
    #[validate(length(min = 1, code = "required", message = "All fields are required"))]
    email: String,
    #[validate(
        length(min = 1, code = "required", message = "All fields are required"),
        custom = "password_long_enough"
    )]
    password: String,
}

fn password_long_enough(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= MIN_PASSWORD_LENGTH {
        return Ok(());
    }
    let mut err = ValidationError::new("too_short");
    err.message = Some(Cow::Owned(format!("Password must be at least {MIN_PASSWORD_LENGTH} characters")));
    Err(err)
}

/// Picks the message to show: missing fields take precedence over other rules.
fn first_message(errors: &ValidationErrors) -> String {
    let all: Vec<&ValidationError> = errors.field_errors().into_values().flatten().collect();
    all.iter()
        .find(|e| e.code == REQUIRED)
        .or_else(|| all.first())
        .and_then(|e| e.message.as_ref())
        .map_or_else(|| "Invalid input".to_string(), ToString::to_string)
}

pub fn validate_login(email: &str, password: &str) -> Result<(), AuthError> {
    LoginForm { email: email.to_string(), password: password.to_string() }
        .validate()
        .map_err(|e| AuthError::Validation(first_message(&e)))
}

pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), AuthError> {
    SignupForm { name: name.to_string(), email: email.to_string(), password: password.to_string() }
        .validate()
        .map_err(|e| AuthError::Validation(first_message(&e)))
}
