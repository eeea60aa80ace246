//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::{
    error::AuthError,
    models::{LoginRequest, RegisterRequest, UpdateUserRequest},
};

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("username is required".to_string());
    }

    if username.len() < 3 {
        return Err("username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err(
            "username can only contain lowercase letters, numbers, and underscores".to_string(),
        );
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str, max_len: usize) -> Result<(), String> {
    if email.is_empty() {
        return Err("email is required".to_string());
    }

    if email.len() > max_len {
        return Err(format!("email must be at most {} characters long", max_len));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("password is required".to_string());
    }

    if password.len() < 6 {
        return Err("password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate short bio
pub fn validate_short_bio(short_bio: &str) -> Result<(), String> {
    if short_bio.chars().count() > 160 {
        return Err("short bio must be at most 160 characters long".to_string());
    }
    Ok(())
}

/// Validate a login payload
pub fn validate_login(request: &LoginRequest) -> Result<(), AuthError> {
    validate_email(&request.email, 50)
        .and_then(|_| validate_password(&request.password))
        .map_err(AuthError::BadRequest)
}

/// Validate a registration payload
pub fn validate_registration(request: &RegisterRequest) -> Result<(), AuthError> {
    validate_username(&request.username)
        .and_then(|_| validate_email(&request.email, 254))
        .and_then(|_| validate_password(&request.password))
        .and_then(|_| validate_short_bio(&request.short_bio))
        .map_err(AuthError::BadRequest)
}

/// Validate a profile update; only the fields being changed are checked
pub fn validate_update(request: &UpdateUserRequest) -> Result<(), AuthError> {
    request
        .username()
        .map_or(Ok(()), validate_username)
        .and_then(|_| request.password().map_or(Ok(()), validate_password))
        .and_then(|_| request.short_bio().map_or(Ok(()), validate_short_bio))
        .map_err(AuthError::BadRequest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterRequest {
        RegisterRequest {
            username: "alice_01".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            short_bio: String::new(),
        }
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("bo").is_err());
        assert!(validate_username("Bob").is_err());
        assert!(validate_username("bob smith").is_err());
    }

    #[test]
    fn test_login_rules() {
        let ok = LoginRequest {
            email: "a@b.io".to_string(),
            password: "123456".to_string(),
        };
        assert!(validate_login(&ok).is_ok());

        let short = LoginRequest {
            password: "12345".to_string(),
            ..ok.clone()
        };
        assert!(matches!(validate_login(&short), Err(AuthError::BadRequest(_))));

        let long_email = LoginRequest {
            email: format!("{}@example.com", "a".repeat(40)),
            ..ok
        };
        assert!(validate_login(&long_email).is_err());
    }

    #[test]
    fn test_registration_rules() {
        assert!(validate_registration(&registration()).is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..registration()
        };
        assert_eq!(
            validate_registration(&bad_email),
            Err(AuthError::BadRequest("invalid email format".to_string()))
        );

        let long_bio = RegisterRequest {
            short_bio: "x".repeat(161),
            ..registration()
        };
        assert!(validate_registration(&long_bio).is_err());
    }

    #[test]
    fn test_update_rules() {
        assert!(validate_update(&UpdateUserRequest::default()).is_ok());

        let rename = UpdateUserRequest {
            username: Some("alice_02".to_string()),
            ..Default::default()
        };
        assert!(validate_update(&rename).is_ok());

        let uppercase = UpdateUserRequest {
            username: Some("Alice".to_string()),
            ..Default::default()
        };
        assert!(matches!(validate_update(&uppercase), Err(AuthError::BadRequest(_))));

        let short_password = UpdateUserRequest {
            password: Some("12345".to_string()),
            ..Default::default()
        };
        assert!(validate_update(&short_password).is_err());

        let cleared = UpdateUserRequest {
            username: Some(String::new()),
            password: Some(String::new()),
            short_bio: Some(String::new()),
        };
        assert!(validate_update(&cleared).is_ok());
    }
}
