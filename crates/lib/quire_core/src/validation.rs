//! Input rules applied before anything reaches the store.

use crate::error::{CoreError, CoreResult};

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;
pub const COMMENT_MIN: usize = 2;

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::Validation(message.into())
}

pub fn username(value: &str) -> CoreResult<()> {
    let len = value.trim().chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(invalid(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    // Logins accept either form, so a username must never look like an email.
    if value.contains('@') {
        return Err(invalid("username must not contain '@'"));
    }
    Ok(())
}

pub fn email(value: &str) -> CoreResult<()> {
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(invalid("email must be a valid address"));
    }
    Ok(())
}

/// At least [`PASSWORD_MIN`] ASCII letters and digits, with one of each.
pub fn password(value: &str) -> CoreResult<()> {
    if value.chars().count() < PASSWORD_MIN {
        return Err(invalid(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("password may contain only letters and digits"));
    }
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !(has_letter && has_digit) {
        return Err(invalid("password must contain a letter and a digit"));
    }
    Ok(())
}

pub fn non_empty(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn comment(value: &str) -> CoreResult<()> {
    if value.trim().chars().count() < COMMENT_MIN {
        return Err(invalid(format!(
            "comment must be at least {COMMENT_MIN} characters"
        )));
    }
    Ok(())
}
