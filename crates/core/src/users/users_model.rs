//! User domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldErrors, Result};

const MIN_PASSWORD_LENGTH: usize = 8;

/// A registered user. The password hash never leaves the storage boundary
/// except through [`UserCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// User row together with its stored password hash, for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Registration data. The password is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

/// Profile update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn check_email(email: &str, errors: &mut FieldErrors) {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.add("email", "Invalid email address");
    }
}

pub(crate) fn check_full_name(full_name: &str, errors: &mut FieldErrors) {
    let len = full_name.chars().count();
    if len < 2 {
        errors.add("fullName", "Full name must be at least 2 characters");
    } else if len > 100 {
        errors.add("fullName", "Full name must be at most 100 characters");
    }
}

/// Checks a signup form before the password is hashed.
pub fn validate_signup(full_name: &str, email: &str, password: &str) -> Result<()> {
    let mut errors = FieldErrors::new();
    check_full_name(full_name.trim(), &mut errors);
    check_email(&normalize_email(email), &mut errors);
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        );
    }
    errors.into_result()
}
