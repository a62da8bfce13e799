//! Client-side input validation
//!
//! Validation failures are raised before any network call is made and carry
//! a displayable message.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// 入力検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name must be at least 3 characters")]
    NameTooShort,

    #[error("Invalid e-mail address")]
    InvalidEmail,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("Password must contain letters and numbers")]
    PasswordTooWeak,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("{0} is required")]
    Required(&'static str),
}

/// 名前の検証（3文字以上）
pub fn name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 3 {
        return Err(ValidationError::NameTooShort);
    }
    Ok(())
}

/// メールアドレスの検証
pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// パスワードの検証（8文字以上・英字と数字を含む）
pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < 8 {
        return Err(ValidationError::PasswordTooShort);
    }
    let has_letter = value.chars().any(|c| c.is_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ValidationError::PasswordTooWeak);
    }
    Ok(())
}

/// パスワードと確認入力の一致検証
pub fn passwords_match(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// 必須項目の検証
pub fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rejects_short_values() {
        assert_eq!(name("Jo"), Err(ValidationError::NameTooShort));
        assert_eq!(name("  a  "), Err(ValidationError::NameTooShort));
        assert!(name("Ana").is_ok());
    }

    #[test]
    fn email_rejects_malformed_values() {
        assert!(email("maria@example.com").is_ok());
        assert_eq!(email(""), Err(ValidationError::InvalidEmail));
        assert_eq!(email("maria"), Err(ValidationError::InvalidEmail));
        assert_eq!(email("maria@example"), Err(ValidationError::InvalidEmail));
        assert_eq!(email("ma ria@example.com"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn password_requires_length_and_mix() {
        assert_eq!(password("abc1"), Err(ValidationError::PasswordTooShort));
        assert_eq!(password("abcdefgh"), Err(ValidationError::PasswordTooWeak));
        assert_eq!(password("12345678"), Err(ValidationError::PasswordTooWeak));
        assert!(password("abcdef12").is_ok());
    }

    #[test]
    fn passwords_must_match() {
        assert_eq!(
            passwords_match("abcdef12", "abcdef13"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(passwords_match("abcdef12", "abcdef12").is_ok());
    }
}
