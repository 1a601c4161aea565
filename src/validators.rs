/// Input validation for user creation.
///
/// Limits mirror the column definitions: `login` is VARCHAR(20) with a
/// unique index, `password` is bcrypt-hashed into VARCHAR(100).

use crate::error::{AppError, ValidationError};

const MAX_LOGIN_LENGTH: usize = 20;
const MAX_FULL_NAME_LENGTH: usize = 200;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a login: non-empty, fits the column, no whitespace.
pub fn is_valid_login(login: &str) -> Result<String, AppError> {
    let login = login.trim();
    if login.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "login".to_string(),
        )));
    }
    // VARCHAR(20) limits characters, not bytes
    if login.chars().count() > MAX_LOGIN_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "login".to_string(),
            MAX_LOGIN_LENGTH,
        )));
    }
    if login.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(ValidationError::InvalidFormat(
            "login".to_string(),
        )));
    }
    Ok(login.to_string())
}

/// Validate a password: non-empty, bounded to prevent bcrypt DoS.
pub fn is_valid_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "password".to_string(),
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_LENGTH,
        )));
    }
    Ok(())
}

/// Validate a full name: non-empty, bounded.
pub fn is_valid_full_name(full_name: &str) -> Result<String, AppError> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptyField(
            "full_name".to_string(),
        )));
    }
    if full_name.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "full_name".to_string(),
            MAX_FULL_NAME_LENGTH,
        )));
    }
    Ok(full_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_login_passes() {
        assert_eq!(is_valid_login("alice").unwrap(), "alice");
        assert_eq!(is_valid_login("  alice  ").unwrap(), "alice");
    }

    #[test]
    fn empty_login_fails() {
        assert!(is_valid_login("").is_err());
        assert!(is_valid_login("   ").is_err());
    }

    #[test]
    fn oversized_login_fails() {
        assert!(is_valid_login(&"a".repeat(21)).is_err());
        assert!(is_valid_login(&"a".repeat(20)).is_ok());
    }

    #[test]
    fn login_length_is_counted_in_characters() {
        // 20 two-byte characters fit VARCHAR(20)
        assert!(is_valid_login(&"ё".repeat(20)).is_ok());
        assert!(is_valid_login(&"ё".repeat(21)).is_err());
        assert!(is_valid_full_name(&"ё".repeat(200)).is_ok());
    }

    #[test]
    fn login_with_whitespace_fails() {
        assert!(is_valid_login("ali ce").is_err());
    }

    #[test]
    fn empty_password_fails() {
        assert!(is_valid_password("").is_err());
        assert!(is_valid_password("secret123").is_ok());
    }

    #[test]
    fn oversized_password_fails() {
        assert!(is_valid_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn full_name_is_trimmed() {
        assert_eq!(is_valid_full_name(" Alice A ").unwrap(), "Alice A");
        assert!(is_valid_full_name("  ").is_err());
    }
}
