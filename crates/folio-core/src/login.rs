//! Admin sign-in form validation

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email regex")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginField {
    Email,
    Password,
}

/// Field-keyed error messages for a rejected form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<LoginField, String>);

impl FieldErrors {
    pub fn get(&self, field: LoginField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn insert(&mut self, field: LoginField, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL.is_match(email)
}

/// Check the form before it reaches the auth collaborator
pub fn validate_login(form: &LoginForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if !is_valid_email(&form.email) {
        errors.insert(LoginField::Email, "Please enter a valid email address");
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(LoginField::Password, "Password must be at least 6 characters");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Rewrite known auth failures into something a person can act on
pub fn friendly_auth_message(raw: &str) -> String {
    if raw.contains("Invalid login credentials") {
        "Invalid email or password".to_string()
    } else if raw.contains("User already registered") {
        "This email is already registered. Please sign in.".to_string()
    } else {
        raw.to_string()
    }
}
