//! Client-side checks that run before any request leaves the process.

use regex::Regex;

/// Symbols accepted (and one of which is required) in a password.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Input rejected before it reached the API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "Password must be at least {min} characters and include uppercase, lowercase, a digit, and a special character.",
        min = MIN_PASSWORD_LEN
    )]
    WeakPassword,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    /// Registration or reset link arrived without its token.
    #[error("Invalid or expired verification link")]
    MissingToken,

    /// LinkedIn callback `state` differs from the one we issued.
    #[error("LinkedIn sign-in could not be verified. Please try again.")]
    StateMismatch,
}

/// Returns `true` if `password` satisfies the strength policy.
///
/// A strong password:
/// - is at least [`MIN_PASSWORD_LEN`] characters long
/// - contains a lowercase letter, an uppercase letter and a digit
/// - contains one of [`PASSWORD_SYMBOLS`]
/// - contains nothing but ASCII letters, digits and those symbols
#[must_use]
pub fn is_strong_password(password: &str) -> bool {
    let alphabet = format!("^[A-Za-z0-9{}]+$", regex::escape(PASSWORD_SYMBOLS));
    let allowed = Regex::new(&alphabet).is_ok_and(|re| re.is_match(password));

    allowed
        && password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email.trim()))
}

/// Strength first, then confirmation.
///
/// # Errors
///
/// [`ValidationError::WeakPassword`] or [`ValidationError::PasswordMismatch`].
pub fn check_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if !is_strong_password(password) {
        return Err(ValidationError::WeakPassword);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Returns the trimmed value, or an error naming `field` when it is blank.
///
/// # Errors
///
/// [`ValidationError::MissingField`] when `value` is empty after trimming.
pub fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value)
    }
}

/// Required and well-formed email.
///
/// # Errors
///
/// [`ValidationError::MissingField`] or [`ValidationError::InvalidEmail`].
pub fn require_email(email: &str) -> Result<&str, ValidationError> {
    let email = require("Email", email)?;
    if is_valid_email(email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// A link token taken from a query string: present and non-blank.
///
/// # Errors
///
/// [`ValidationError::MissingToken`] when absent or blank.
pub fn require_link_token(token: Option<&str>) -> Result<&str, ValidationError> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ValidationError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_accepted() {
        assert!(is_strong_password("Abc123!@"));
        assert!(is_strong_password("Passw0rd$"));
        assert!(is_strong_password("zZ9&zZ9&zZ9&"));
    }

    #[test]
    fn password_missing_a_class_rejected() {
        assert!(!is_strong_password("abc12345")); // no upper, no symbol
        assert!(!is_strong_password("ABC123!@")); // no lower
        assert!(!is_strong_password("Abcdefg!")); // no digit
        assert!(!is_strong_password("Abcdefg1")); // no symbol
    }

    #[test]
    fn short_password_rejected() {
        assert!(!is_strong_password("Ab1!"));
        assert!(!is_strong_password("Abc12!@")); // 7 chars
        assert!(!is_strong_password(""));
    }

    #[test]
    fn length_boundary_follows_min_password_len() {
        let at_min = format!("Ab1!{}", "x".repeat(MIN_PASSWORD_LEN - 4));
        assert_eq!(at_min.len(), MIN_PASSWORD_LEN);
        assert!(is_strong_password(&at_min));
        assert!(!is_strong_password(&at_min[..MIN_PASSWORD_LEN - 1]));
    }

    #[test]
    fn every_listed_symbol_accepted() {
        for symbol in PASSWORD_SYMBOLS.chars() {
            let password = format!("Abc1234{symbol}");
            assert!(is_strong_password(&password), "{password}");
        }
    }

    #[test]
    fn symbol_outside_allowed_set_rejected() {
        assert!(!is_strong_password("Abc123#-"));
        assert!(!is_strong_password("Abc 123!"));
        assert!(!is_strong_password("Äbc123!@"));
    }

    #[test]
    fn check_new_password_order() {
        assert_eq!(check_new_password("Abc123!@", "Abc123!@"), Ok(()));
        assert_eq!(
            check_new_password("Abc123!@", "Abc123!#"),
            Err(ValidationError::PasswordMismatch)
        );
        // weak wins over mismatch
        assert_eq!(
            check_new_password("abc12345", "other"),
            Err(ValidationError::WeakPassword)
        );
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email(" user@example.com "));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn require_trims_and_names_field() {
        assert_eq!(require("First name", "  Asha "), Ok("Asha"));
        assert_eq!(
            require("First name", "   "),
            Err(ValidationError::MissingField("First name"))
        );
        assert_eq!(
            require_email(""),
            Err(ValidationError::MissingField("Email"))
        );
        assert_eq!(require_email("nope"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn link_token_must_be_present() {
        assert_eq!(require_link_token(Some("abc")), Ok("abc"));
        assert_eq!(require_link_token(Some("  ")), Err(ValidationError::MissingToken));
        assert_eq!(require_link_token(None), Err(ValidationError::MissingToken));
    }

    #[test]
    fn weak_password_message() {
        assert!(
            ValidationError::WeakPassword
                .to_string()
                .starts_with("Password must be at least 8 characters")
        );
    }
}
