//! Account model type.

use serde::{Deserialize, Serialize};

/// A registered mail account.
///
/// Both the display name and the email address are unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// Display name, also the lookup key.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl Account {
    /// Create a new account.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Account standing in for a sender that is not registered locally.
    ///
    /// The address doubles as the display name.
    #[must_use]
    pub fn external(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            name: email.clone(),
            email,
        }
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
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
    fn new_sets_fields() {
        let account = Account::new("Nikolay", "niki@abv.bg");
        assert_eq!(account.name, "Nikolay");
        assert_eq!(account.email, "niki@abv.bg");
    }

    #[test]
    fn external_uses_address_as_name() {
        let account = Account::external("stranger@example.com");
        assert_eq!(account.name, "stranger@example.com");
        assert_eq!(account.email, "stranger@example.com");
    }

    #[test]
    fn display() {
        let account = Account::new("Gosho", "gosho@abv.bg");
        assert_eq!(account.to_string(), "Gosho <gosho@abv.bg>");
    }

    #[test]
    fn serde_roundtrip() {
        let account = Account::new("Ivan", "ivan@abv.bg");
        let json = serde_json::to_string(&account).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }
}
