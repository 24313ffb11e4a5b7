//! Rule definition parsing.

use std::collections::BTreeSet;

use tracing::debug;

use super::model::Criteria;
use crate::error::{Error, Result};

/// Criterion keywords understood in rule definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `subject-includes`
    SubjectIncludes,
    /// `subject-or-body-includes`
    SubjectOrBodyIncludes,
    /// `recipients-includes`
    RecipientsIncludes,
    /// `from`
    From,
}

impl Keyword {
    /// All keywords, in canonical order.
    pub const ALL: [Self; 4] = [
        Self::SubjectIncludes,
        Self::SubjectOrBodyIncludes,
        Self::RecipientsIncludes,
        Self::From,
    ];

    /// Parse a keyword. Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|keyword| keyword.as_str() == s)
    }

    /// Keyword as written in definitions.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubjectIncludes => "subject-includes",
            Self::SubjectOrBodyIncludes => "subject-or-body-includes",
            Self::RecipientsIncludes => "recipients-includes",
            Self::From => "from",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to treat input the grammar does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Skip unknown keywords and lines without a colon.
    #[default]
    Lenient,
    /// Reject unknown keywords, lines without a colon and multi-token `from`.
    Strict,
}

/// Compile a rule definition into [`Criteria`].
///
/// Every non-blank line has the form `keyword: value`; `\n`, `\r\n` and a
/// lone `\r` all end a line. A bare keyword line counts as the keyword with
/// an empty value. List values are split on commas and trimmed; empty tokens
/// are dropped.
///
/// # Errors
///
/// - [`Error::RuleAlreadyDefined`] if a keyword appears twice.
/// - [`Error::InvalidRuleDefinition`] for input [`ParseMode::Strict`] rejects.
pub fn parse_definition(definition: &str, mode: ParseMode) -> Result<Criteria> {
    let mut criteria = Criteria::default();
    let mut seen: Vec<Keyword> = Vec::with_capacity(Keyword::ALL.len());

    for line in definition.split(['\r', '\n']) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((name, value)) = line
            .split_once(':')
            .or_else(|| Keyword::parse(line).map(|_| (line, "")))
        else {
            if mode == ParseMode::Strict {
                return Err(Error::InvalidRuleDefinition(format!(
                    "expected 'keyword: value', got '{line}'"
                )));
            }
            debug!(line, "Skipping rule line without keyword");
            continue;
        };

        let name = name.trim();
        let Some(keyword) = Keyword::parse(name) else {
            if mode == ParseMode::Strict {
                return Err(Error::InvalidRuleDefinition(format!(
                    "unknown keyword '{name}'"
                )));
            }
            debug!(keyword = name, "Ignoring unknown rule keyword");
            continue;
        };

        if seen.contains(&keyword) {
            return Err(Error::RuleAlreadyDefined(keyword.as_str().to_string()));
        }
        seen.push(keyword);

        let tokens = split_tokens(value);
        match keyword {
            Keyword::SubjectIncludes => criteria.subject_includes = tokens,
            Keyword::SubjectOrBodyIncludes => criteria.subject_or_body_includes = tokens,
            Keyword::RecipientsIncludes => criteria.recipients_includes = tokens,
            Keyword::From => {
                if mode == ParseMode::Strict && tokens.len() > 1 {
                    return Err(Error::InvalidRuleDefinition(format!(
                        "'{keyword}' takes a single address"
                    )));
                }
                criteria.from = first_token(value);
            }
        }
    }

    Ok(criteria)
}

fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn split_tokens(value: &str) -> BTreeSet<String> {
    tokens(value).map(ToString::to_string).collect()
}

fn first_token(value: &str) -> Option<String> {
    tokens(value).next().map(ToString::to_string)
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
    use proptest::prelude::*;

    fn lenient(definition: &str) -> Result<Criteria> {
        parse_definition(definition, ParseMode::Lenient)
    }

    fn strict(definition: &str) -> Result<Criteria> {
        parse_definition(definition, ParseMode::Strict)
    }

    #[test]
    fn keyword_roundtrip() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::parse(keyword.as_str()), Some(keyword));
        }
        assert_eq!(Keyword::parse("From"), None);
    }

    #[test]
    fn parses_all_four() {
        let criteria = lenient(concat!(
            "subject-includes: mjt, izpit, 2022\n",
            "subject-or-body-includes: izpit\n",
            "recipients-includes: pesho@gmail.com, gosho@gmail.com\n",
            "from: stoyo@fmi.bg",
        ))
        .unwrap();

        assert_eq!(criteria.subject_includes.len(), 3);
        assert!(criteria.subject_includes.contains("2022"));
        assert!(criteria.subject_or_body_includes.contains("izpit"));
        assert!(criteria.recipients_includes.contains("gosho@gmail.com"));
        assert_eq!(criteria.from.as_deref(), Some("stoyo@fmi.bg"));
    }

    #[test]
    fn order_independent_and_crlf() {
        let a = lenient("from: a@b.c\r\nsubject-includes: x").unwrap();
        let b = lenient("subject-includes: x\nfrom: a@b.c").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn trims_tokens_and_drops_empty_ones() {
        let criteria = lenient("subject-includes:  a ,, b c ,").unwrap();
        let tokens: Vec<_> = criteria.subject_includes.iter().map(String::as_str).collect();
        assert_eq!(tokens, vec!["a", "b c"]);
    }

    #[test]
    fn duplicate_keyword_fails() {
        let err = lenient("subject-includes: a\nsubject-includes: b").unwrap_err();
        assert!(matches!(err, Error::RuleAlreadyDefined(ref k) if k == "subject-includes"));

        assert!(matches!(
            lenient("from: a@b.c\nfrom: a@b.c"),
            Err(Error::RuleAlreadyDefined(_))
        ));
    }

    #[test]
    fn lone_carriage_return_ends_a_line() {
        let criteria = lenient("subject-includes: a\rfrom: x@y").unwrap();
        let tokens: Vec<_> = criteria.subject_includes.iter().map(String::as_str).collect();
        assert_eq!(tokens, vec!["a"]);
        assert_eq!(criteria.from.as_deref(), Some("x@y"));
    }

    #[test]
    fn bare_keyword_counts_as_defined() {
        let criteria = lenient("subject-includes").unwrap();
        assert!(criteria.is_empty());

        for definition in [
            "subject-includes: a\nsubject-includes",
            "subject-includes\nsubject-includes: a",
        ] {
            assert!(matches!(
                lenient(definition),
                Err(Error::RuleAlreadyDefined(ref k)) if k == "subject-includes"
            ));
        }
        assert!(matches!(
            strict("from\nfrom: a@b.c"),
            Err(Error::RuleAlreadyDefined(_))
        ));
    }

    #[test]
    fn lenient_ignores_unknown_keyword_and_noise() {
        let criteria = lenient("body-includes: x\njust words\nsubject-includes: y").unwrap();
        assert_eq!(criteria.subject_includes.len(), 1);
        assert!(criteria.subject_or_body_includes.is_empty());
    }

    #[test]
    fn strict_rejects_unknown_keyword() {
        assert!(matches!(
            strict("body-includes: x"),
            Err(Error::InvalidRuleDefinition(_))
        ));
    }

    #[test]
    fn strict_rejects_line_without_colon() {
        assert!(matches!(
            strict("subject-includes: a\nstray"),
            Err(Error::InvalidRuleDefinition(_))
        ));
    }

    #[test]
    fn from_takes_single_token() {
        let criteria = lenient("from: a@b.c, d@e.f").unwrap();
        assert_eq!(criteria.from.as_deref(), Some("a@b.c"));
        assert!(matches!(
            strict("from: a@b.c, d@e.f"),
            Err(Error::InvalidRuleDefinition(_))
        ));
    }

    #[test]
    fn empty_from_is_unset() {
        let criteria = lenient("from:   ").unwrap();
        assert!(criteria.from.is_none());
        assert!(criteria.is_empty());
    }

    #[test]
    fn empty_definition_has_no_criteria() {
        assert!(lenient("").unwrap().is_empty());
        assert!(lenient("\n\n").unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn parsed_tokens_are_trimmed_and_nonempty(
            tokens in prop::collection::vec("[ a-z0-9]{0,6}", 0..8)
        ) {
            let definition = format!("subject-includes: {}", tokens.join(","));
            let criteria = lenient(&definition).unwrap();
            for token in &criteria.subject_includes {
                prop_assert!(!token.is_empty());
                prop_assert_eq!(token.trim(), token.as_str());
            }
        }
    }
}
