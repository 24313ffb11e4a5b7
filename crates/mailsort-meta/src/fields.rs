//! Raw `key: value` field scanning.

use std::fmt;

/// Ordered collection of metadata fields.
///
/// Keys are stored lowercased. Repeated keys are kept; lookups return the
/// first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    entries: Vec<(String, String)>,
}

impl Fields {
    /// Creates an empty field collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into().to_lowercase(), value.into()));
    }

    /// Gets the first value for a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of fields, counting repeats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field was scanned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scans fields from raw text.
    ///
    /// Lines end at `\n`, `\r\n` or a lone `\r`. Each non-blank line is
    /// split on its first `:`. Lines without a colon are skipped, so values
    /// such as `14:14` survive intact.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut fields = Self::new();

        for line in text.split(['\r', '\n']) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some((name, value)) = line.split_once(':') {
                let name = name.trim();
                if !name.is_empty() {
                    fields.add(name, value.trim());
                }
            }
        }

        fields
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
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
    fn test_fields_add_get() {
        let mut fields = Fields::new();
        fields.add("Subject", "Hello");
        assert_eq!(fields.get("subject"), Some("Hello"));
        assert_eq!(fields.get("SUBJECT"), Some("Hello"));
    }

    #[test]
    fn test_fields_first_value_wins() {
        let mut fields = Fields::new();
        fields.add("sender", "a@example.com");
        fields.add("sender", "b@example.com");
        assert_eq!(fields.get("sender"), Some("a@example.com"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_fields_parse_keeps_colons_in_value() {
        let fields = Fields::parse("received: 2022-12-08 14:14\r\nsubject: re: hi");
        assert_eq!(fields.get("received"), Some("2022-12-08 14:14"));
        assert_eq!(fields.get("subject"), Some("re: hi"));
    }

    #[test]
    fn test_fields_parse_lone_carriage_return() {
        let fields = Fields::parse("sender: x@y.z\rsubject: Hi\r\rreceived: 2022-12-08 14:14");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("sender"), Some("x@y.z"));
        assert_eq!(fields.get("subject"), Some("Hi"));
        assert_eq!(fields.get("received"), Some("2022-12-08 14:14"));
    }

    #[test]
    fn test_fields_parse_only_noise_is_empty() {
        assert!(Fields::parse("\r\n  \nno colon here\n").is_empty());
        assert!(Fields::new().is_empty());
    }

    #[test]
    fn test_fields_parse_skips_noise() {
        let fields = Fields::parse("\n   \nno colon here\n: empty key\nsender: x@y.z\n");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("sender"), Some("x@y.z"));
    }

    #[test]
    fn test_fields_display() {
        let mut fields = Fields::new();
        fields.add("sender", "a@example.com");
        fields.add("subject", "Hi");
        assert_eq!(fields.to_string(), "sender: a@example.com\nsubject: Hi\n");
    }
}
