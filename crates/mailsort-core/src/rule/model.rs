//! Rule model types and matching.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::mail::Mail;

/// Rule priority. Lower values take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u8);

impl Priority {
    /// Highest precedence.
    pub const HIGHEST: Self = Self(1);
    /// Lowest precedence.
    pub const LOWEST: Self = Self(10);

    /// Create a priority, checking it lies in `HIGHEST..=LOWEST`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPriority`] for values outside the range.
    pub fn new(value: u8) -> Result<Self> {
        if value < Self::HIGHEST.0 || value > Self::LOWEST.0 {
            return Err(Error::InvalidPriority(value));
        }
        Ok(Self(value))
    }

    /// Numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four optional match criteria of a rule.
///
/// Empty sets and `None` mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Every token must occur in the subject.
    pub subject_includes: BTreeSet<String>,
    /// Every token must occur in the subject or in the body.
    pub subject_or_body_includes: BTreeSet<String>,
    /// At least one address must be a recipient.
    pub recipients_includes: BTreeSet<String>,
    /// Exact sender address.
    pub from: Option<String>,
}

impl Criteria {
    /// Whether no criterion is set at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject_includes.is_empty()
            && self.subject_or_body_includes.is_empty()
            && self.recipients_includes.is_empty()
            && self.from.is_none()
    }

    /// Evaluate the criteria against `mail`.
    #[must_use]
    pub fn matches(&self, mail: &Mail) -> bool {
        if self
            .from
            .as_deref()
            .is_some_and(|from| from != mail.sender_email())
        {
            return false;
        }

        // `from` alone never qualifies a match.
        let mut checked = false;

        if !self.recipients_includes.is_empty() {
            checked = true;
            if !self
                .recipients_includes
                .iter()
                .any(|address| mail.is_addressed_to(address))
            {
                return false;
            }
        }

        if !self.subject_includes.is_empty() {
            checked = true;
            if !self
                .subject_includes
                .iter()
                .all(|token| mail.subject.contains(token.as_str()))
            {
                return false;
            }
        }

        if !self.subject_or_body_includes.is_empty() {
            checked = true;
            if !self.subject_or_body_includes.iter().all(|token| {
                mail.subject.contains(token.as_str()) || mail.body.contains(token.as_str())
            }) {
                return false;
            }
        }

        checked
    }
}

/// A routing rule: criteria, destination folder and priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    folder: String,
    priority: Priority,
    criteria: Criteria,
}

impl Rule {
    /// Create a rule from already compiled criteria.
    #[must_use]
    pub fn new(folder: impl Into<String>, priority: Priority, criteria: Criteria) -> Self {
        Self {
            folder: folder.into(),
            priority,
            criteria,
        }
    }

    /// Destination folder path.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Rule priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Compiled criteria.
    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Whether `mail` satisfies this rule.
    #[must_use]
    pub fn matches(&self, mail: &Mail) -> bool {
        self.criteria.matches(mail)
    }

    /// Same priority and same criteria, regardless of destination.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.priority == other.priority && self.criteria == other.criteria
    }

    /// Equivalent to `other` but routing somewhere else.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.is_equivalent(other) && self.folder != other.folder
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
    use crate::account::Account;
    use proptest::prelude::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn mail() -> Mail {
        Mail::new(
            Account::new("Nikolay", "niki@abv.bg"),
            ["stoyo@gmail.com", "ivan@abv.bg"],
            "football world cup final",
            "Everyone is watching the final today",
            None,
        )
    }

    mod priority_tests {
        use super::*;

        #[test]
        fn accepts_range() {
            assert_eq!(Priority::new(1).unwrap(), Priority::HIGHEST);
            assert_eq!(Priority::new(10).unwrap(), Priority::LOWEST);
            assert_eq!(Priority::new(4).unwrap().get(), 4);
        }

        #[test]
        fn rejects_out_of_range() {
            assert!(matches!(Priority::new(0), Err(Error::InvalidPriority(0))));
            assert!(matches!(Priority::new(11), Err(Error::InvalidPriority(11))));
        }

        #[test]
        fn lower_value_orders_first() {
            assert!(Priority::HIGHEST < Priority::LOWEST);
        }
    }

    mod matching_tests {
        use super::*;

        #[test]
        fn empty_criteria_never_match() {
            assert!(Criteria::default().is_empty());
            assert!(!Criteria::default().matches(&mail()));
        }

        #[test]
        fn from_alone_never_matches() {
            let criteria = Criteria {
                from: Some("niki@abv.bg".to_string()),
                ..Criteria::default()
            };
            assert!(!criteria.matches(&mail()));
        }

        #[test]
        fn from_mismatch_short_circuits() {
            let criteria = Criteria {
                subject_includes: set(&["football"]),
                from: Some("gosho@abv.bg".to_string()),
                ..Criteria::default()
            };
            assert!(!criteria.matches(&mail()));
        }

        #[test]
        fn from_match_with_other_criterion() {
            let criteria = Criteria {
                subject_includes: set(&["football"]),
                from: Some("niki@abv.bg".to_string()),
                ..Criteria::default()
            };
            assert!(criteria.matches(&mail()));
        }

        #[test]
        fn subject_requires_every_token() {
            let hit = Criteria {
                subject_includes: set(&["world", "cup"]),
                ..Criteria::default()
            };
            let miss = Criteria {
                subject_includes: set(&["world", "basketball"]),
                ..Criteria::default()
            };
            assert!(hit.matches(&mail()));
            assert!(!miss.matches(&mail()));
        }

        #[test]
        fn subject_is_substring_and_case_sensitive() {
            let substring = Criteria {
                subject_includes: set(&["ball wor"]),
                ..Criteria::default()
            };
            let wrong_case = Criteria {
                subject_includes: set(&["Football"]),
                ..Criteria::default()
            };
            assert!(substring.matches(&mail()));
            assert!(!wrong_case.matches(&mail()));
        }

        #[test]
        fn subject_or_body_per_token() {
            // "final" is in both, "watching" only in the body, "cup" only in the subject.
            let criteria = Criteria {
                subject_or_body_includes: set(&["final", "watching", "cup"]),
                ..Criteria::default()
            };
            assert!(criteria.matches(&mail()));

            let miss = Criteria {
                subject_or_body_includes: set(&["final", "tennis"]),
                ..Criteria::default()
            };
            assert!(!miss.matches(&mail()));
        }

        #[test]
        fn recipients_need_any() {
            let hit = Criteria {
                recipients_includes: set(&["nobody@x.com", "ivan@abv.bg"]),
                ..Criteria::default()
            };
            let miss = Criteria {
                recipients_includes: set(&["nobody@x.com"]),
                ..Criteria::default()
            };
            assert!(hit.matches(&mail()));
            assert!(!miss.matches(&mail()));
        }

        #[test]
        fn all_criteria_together() {
            let criteria = Criteria {
                subject_includes: set(&["final"]),
                subject_or_body_includes: set(&["today"]),
                recipients_includes: set(&["stoyo@gmail.com"]),
                from: Some("niki@abv.bg".to_string()),
            };
            assert!(criteria.matches(&mail()));
        }
    }

    mod rule_tests {
        use super::*;

        fn criteria() -> Criteria {
            Criteria {
                subject_includes: set(&["mjt"]),
                ..Criteria::default()
            }
        }

        #[test]
        fn accessors() {
            let rule = Rule::new("/inbox/docs", Priority::HIGHEST, criteria());
            assert_eq!(rule.folder(), "/inbox/docs");
            assert_eq!(rule.priority(), Priority::HIGHEST);
            assert_eq!(rule.criteria(), &criteria());
        }

        #[test]
        fn conflict_needs_different_folder() {
            let p = Priority::new(3).unwrap();
            let a = Rule::new("/inbox/a", p, criteria());
            let b = Rule::new("/inbox/b", p, criteria());
            let a2 = Rule::new("/inbox/a", p, criteria());

            assert!(a.conflicts_with(&b));
            assert!(!a.conflicts_with(&a2));
            assert!(a.is_equivalent(&a2));
        }

        #[test]
        fn different_priority_never_conflicts() {
            let a = Rule::new("/inbox/a", Priority::new(3).unwrap(), criteria());
            let b = Rule::new("/inbox/b", Priority::new(4).unwrap(), criteria());
            assert!(!a.conflicts_with(&b));
        }

        #[test]
        fn unset_from_differs_from_set_from() {
            let p = Priority::new(3).unwrap();
            let with_from = Criteria {
                from: Some("a@b.c".to_string()),
                ..criteria()
            };
            let a = Rule::new("/inbox/a", p, criteria());
            let b = Rule::new("/inbox/b", p, with_from);
            assert!(!a.conflicts_with(&b));
        }
    }

    proptest! {
        #[test]
        fn from_only_rule_never_matches(sender in "[a-z]{1,8}@[a-z]{1,8}", subject in ".{0,20}") {
            let criteria = Criteria {
                from: Some(sender.clone()),
                ..Criteria::default()
            };
            let mail = Mail::new(Account::external(sender), ["x@y.z"], subject, "", None);
            prop_assert!(!criteria.matches(&mail));
        }
    }
}
