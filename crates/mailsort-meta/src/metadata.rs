//! Structured mail metadata.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::fields::Fields;

/// `chrono` format of the `received` field.
pub const RECEIVED_FORMAT: &str = "%Y-%m-%d %H:%M";

const SENDER: &str = "sender";
const SUBJECT: &str = "subject";
const RECIPIENTS: &str = "recipients";
const RECEIVED: &str = "received";

/// Parsed mail metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Sender email address.
    pub sender: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Recipient email addresses, deduplicated.
    pub recipients: BTreeSet<String>,
    /// When the mail was received.
    pub received: Option<NaiveDateTime>,
}

impl Metadata {
    /// Parses metadata from its text form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if `received` is present but not in
    /// [`RECEIVED_FORMAT`].
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_fields(&Fields::parse(text))
    }

    /// Builds metadata from already scanned fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if `received` is malformed.
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let received = fields
            .get(RECEIVED)
            .filter(|value| !value.is_empty())
            .map(|value| {
                NaiveDateTime::parse_from_str(value, RECEIVED_FORMAT).map_err(|source| {
                    Error::InvalidTimestamp {
                        value: value.to_string(),
                        source,
                    }
                })
            })
            .transpose()?;

        Ok(Self {
            sender: non_empty(fields.get(SENDER)),
            subject: non_empty(fields.get(SUBJECT)),
            recipients: fields.get(RECIPIENTS).map(split_list).unwrap_or_default(),
            received,
        })
    }

    /// Returns a copy with the sender replaced.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sender) = &self.sender {
            writeln!(f, "{SENDER}: {sender}")?;
        }
        if let Some(subject) = &self.subject {
            writeln!(f, "{SUBJECT}: {subject}")?;
        }
        if !self.recipients.is_empty() {
            let joined = self
                .recipients
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "{RECIPIENTS}: {joined}")?;
        }
        if let Some(received) = &self.received {
            writeln!(f, "{RECEIVED}: {}", received.format(RECEIVED_FORMAT))?;
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(ToString::to_string)
}

fn split_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
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
    use chrono::{NaiveDate, Timelike};
    use proptest::prelude::*;

    #[test]
    fn test_parse_full_block() {
        let text = concat!(
            "sender: testy@gmail.com\n",
            "subject: Hello, MJT!\n",
            "recipients: pesho@gmail.com, gosho@gmail.com,\n",
            "received: 2022-12-08 14:14\n",
        );

        let meta = Metadata::parse(text).unwrap();
        assert_eq!(meta.sender.as_deref(), Some("testy@gmail.com"));
        assert_eq!(meta.subject.as_deref(), Some("Hello, MJT!"));
        assert_eq!(meta.recipients.len(), 2);
        assert!(meta.recipients.contains("pesho@gmail.com"));
        assert!(meta.recipients.contains("gosho@gmail.com"));

        let received = meta.received.unwrap();
        assert_eq!(received.date(), NaiveDate::from_ymd_opt(2022, 12, 8).unwrap());
        assert_eq!(received.hour(), 14);
        assert_eq!(received.minute(), 14);
    }

    #[test]
    fn test_parse_carriage_return_separators() {
        let meta =
            Metadata::parse("sender: a@b.c\rsubject: x\rrecipients: d@e.f\rreceived: 2022-12-08 14:14")
                .unwrap();
        assert_eq!(meta.sender.as_deref(), Some("a@b.c"));
        assert_eq!(meta.subject.as_deref(), Some("x"));
        assert_eq!(meta.recipients.len(), 1);
        assert!(meta.recipients.contains("d@e.f"));
        assert_eq!(meta.received.unwrap().minute(), 14);
    }

    #[test]
    fn test_parse_order_independent() {
        let a = Metadata::parse("subject: x\nsender: a@b.c").unwrap();
        let b = Metadata::parse("sender: a@b.c\nsubject: x").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_missing_fields() {
        let meta = Metadata::parse("subject: only a subject").unwrap();
        assert!(meta.sender.is_none());
        assert!(meta.recipients.is_empty());
        assert!(meta.received.is_none());
    }

    #[test]
    fn test_parse_duplicate_recipients_collapse() {
        let meta = Metadata::parse("recipients: a@b.c, a@b.c ,d@e.f").unwrap();
        assert_eq!(meta.recipients.len(), 2);
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        let err = Metadata::parse("received: yesterday").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_with_sender_overrides() {
        let meta = Metadata::parse("sender: forged@evil.com").unwrap();
        let meta = meta.with_sender("real@example.com");
        assert_eq!(meta.sender.as_deref(), Some("real@example.com"));
    }

    #[test]
    fn test_display_reparses() {
        let meta =
            Metadata::parse("sender: a@b.c\nsubject: s\nrecipients: x@y.z\nreceived: 2023-01-02 03:04")
                .unwrap();
        assert_eq!(Metadata::parse(&meta.to_string()).unwrap(), meta);
    }

    proptest! {
        #[test]
        fn recipients_are_trimmed_and_nonempty(
            addrs in prop::collection::vec("[a-z]{1,8}@[a-z]{1,8}\\.com", 0..6),
            pad in " {0,3}",
        ) {
            let line = addrs
                .iter()
                .map(|a| format!("{pad}{a}{pad}"))
                .collect::<Vec<_>>()
                .join(",");
            let meta = Metadata::parse(&format!("recipients: {line}")).unwrap();

            for recipient in &meta.recipients {
                prop_assert_eq!(recipient.trim(), recipient.as_str());
                prop_assert!(!recipient.is_empty());
            }
            let expected: BTreeSet<String> = addrs.into_iter().collect();
            prop_assert_eq!(meta.recipients, expected);
        }
    }
}
