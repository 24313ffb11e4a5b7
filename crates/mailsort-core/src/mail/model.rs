//! Mail model type.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use mailsort_meta::Metadata;
use serde::{Deserialize, Serialize};

use crate::account::Account;

/// An immutable mail message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    /// Who sent it.
    pub sender: Account,
    /// Recipient email addresses.
    pub recipients: BTreeSet<String>,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// When it was received, if the metadata said so.
    pub received: Option<NaiveDateTime>,
}

impl Mail {
    /// Create a new mail.
    #[must_use]
    pub fn new<I, S>(
        sender: Account,
        recipients: I,
        subject: impl Into<String>,
        body: impl Into<String>,
        received: Option<NaiveDateTime>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sender,
            recipients: recipients.into_iter().map(Into::into).collect(),
            subject: subject.into(),
            body: body.into(),
            received,
        }
    }

    /// Build a mail from parsed metadata and a body.
    ///
    /// `sender` is the resolved sender account; the metadata's own sender
    /// address is only used by the caller to find it.
    #[must_use]
    pub fn from_metadata(sender: Account, metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            sender,
            recipients: metadata.recipients,
            subject: metadata.subject.unwrap_or_default(),
            body: body.into(),
            received: metadata.received,
        }
    }

    /// Sender email address.
    #[must_use]
    pub fn sender_email(&self) -> &str {
        &self.sender.email
    }

    /// Whether `address` is among the recipients.
    #[must_use]
    pub fn is_addressed_to(&self, address: &str) -> bool {
        self.recipients.contains(address)
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
    fn new_deduplicates_recipients() {
        let mail = Mail::new(
            Account::new("Nikolay", "niki@abv.bg"),
            ["stoyo@gmail.com", "ivan@abv.bg", "stoyo@gmail.com"],
            "football world cup final",
            "Everyone is watching the final today",
            None,
        );
        assert_eq!(mail.recipients.len(), 2);
        assert!(mail.is_addressed_to("ivan@abv.bg"));
        assert!(!mail.is_addressed_to("niki@abv.bg"));
        assert_eq!(mail.sender_email(), "niki@abv.bg");
    }

    #[test]
    fn from_metadata_copies_fields() {
        let metadata = Metadata::parse(
            "sender: testy@gmail.com\nsubject: Hello, MJT!\nrecipients: a@b.c\nreceived: 2022-12-08 14:14",
        )
        .unwrap();
        let mail = Mail::from_metadata(Account::external("testy@gmail.com"), metadata, "body");

        assert_eq!(mail.subject, "Hello, MJT!");
        assert_eq!(mail.body, "body");
        assert!(mail.is_addressed_to("a@b.c"));
        assert!(mail.received.is_some());
    }

    #[test]
    fn from_metadata_without_subject() {
        let metadata = Metadata::parse("sender: a@b.c").unwrap();
        let mail = Mail::from_metadata(Account::external("a@b.c"), metadata, "x");
        assert!(mail.subject.is_empty());
        assert!(mail.recipients.is_empty());
        assert!(mail.received.is_none());
    }
}
