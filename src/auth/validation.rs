//! Form Validation
//!
//! Field rules for the login and registration forms. Every failing field
//! is reported at once.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{FieldError, LedgerError, Result};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum accepted display name length.
pub const MIN_NAME_LEN: usize = 2;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

/// Request body for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Request body for `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !email_pattern().is_match(email) {
        errors.push(FieldError::new("email", "Email is invalid"));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::Validation(errors))
    }
}

// == Validate Registration ==
/// Checks a registration form, including the password confirmation field.
pub fn validate_registration(request: &RegisterRequest, confirm_password: &str) -> Result<()> {
    let mut errors = Vec::new();

    if request.name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if request.name.chars().count() < MIN_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at least {MIN_NAME_LEN} characters"),
        ));
    }

    check_email(&request.email, &mut errors);

    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if request.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    if confirm_password.is_empty() {
        errors.push(FieldError::new("confirmPassword", "Please confirm your password"));
    } else if confirm_password != request.password {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }

    finish(errors)
}

// == Validate Login ==
/// Checks a login form. Password length is not enforced at login.
pub fn validate_login(request: &LoginRequest) -> Result<()> {
    let mut errors = Vec::new();

    check_email(&request.email, &mut errors);
    if request.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    finish(errors)
}
