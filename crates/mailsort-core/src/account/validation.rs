//! Account validation.

use super::model::Account;

/// Validation error for a new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Account name is blank.
    EmptyName,
    /// Email address is blank.
    EmptyEmail,
    /// Email address has no single `@` splitting two non-empty parts.
    InvalidEmail,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyName => "Account name can not be empty or blank",
            Self::EmptyEmail => "Email can not be empty or blank",
            Self::InvalidEmail => "Invalid email address format",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating an account.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate an account before registration.
///
/// # Errors
///
/// Returns every `ValidationError` found.
pub fn validate_account(account: &Account) -> ValidationResult {
    let mut errors = Vec::new();

    if account.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    if account.email.trim().is_empty() {
        errors.push(ValidationError::EmptyEmail);
    } else if !is_valid_email(&account.email) {
        errors.push(ValidationError::InvalidEmail);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("gosho@x"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
    }

    #[test]
    fn test_validate_blank_account() {
        let errors = validate_account(&Account::new(" ", "")).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EmptyName, ValidationError::EmptyEmail]
        );
    }

    #[test]
    fn test_validate_bad_email() {
        let errors = validate_account(&Account::new("Ivan", "ivan")).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidEmail]);
        assert_eq!(errors[0].field(), "email");
    }

    #[test]
    fn test_validate_complete_account() {
        assert!(validate_account(&Account::new("Ivan", "ivan@abv.bg")).is_ok());
    }
}
