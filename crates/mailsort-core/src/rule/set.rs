//! Priority-ordered rule collection.

use tracing::debug;

use super::model::Rule;

/// What [`RuleSet::add`] did with a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum RuleOutcome {
    /// The rule was inserted.
    Added,
    /// An equivalent rule at the same priority already routes elsewhere; nothing changed.
    Conflict,
}

impl RuleOutcome {
    /// Whether the rule was inserted.
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::Added)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    rule: Rule,
}

/// Rules of one account, ordered by `(priority, insertion order)`.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl RuleSet {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `rule` unless it conflicts with an existing one.
    ///
    /// A rule conflicts when an existing rule has the same priority and the
    /// same criteria but a different destination folder. Such a rule is
    /// dropped and [`RuleOutcome::Conflict`] is returned; this is not an
    /// error.
    pub fn add(&mut self, rule: Rule) -> RuleOutcome {
        if let Some(existing) = self.iter().find(|existing| existing.conflicts_with(&rule)) {
            debug!(
                folder = rule.folder(),
                existing = existing.folder(),
                priority = rule.priority().get(),
                "Rule conflicts with an existing rule, ignoring"
            );
            return RuleOutcome::Conflict;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let key = (rule.priority(), seq);
        let at = self
            .entries
            .partition_point(|entry| (entry.rule.priority(), entry.seq) < key);
        self.entries.insert(at, Entry { seq, rule });

        RuleOutcome::Added
    }

    /// Rules in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.entries.iter().map(|entry| &entry.rule)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| (w[0].rule.priority(), w[0].seq) < (w[1].rule.priority(), w[1].seq))
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = Box<dyn Iterator<Item = &'a Rule> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
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
    use crate::rule::{Criteria, ParseMode, Priority, parse_definition};
    use proptest::prelude::*;

    fn rule(folder: &str, priority: u8, definition: &str) -> Rule {
        Rule::new(
            folder,
            Priority::new(priority).unwrap(),
            parse_definition(definition, ParseMode::Lenient).unwrap(),
        )
    }

    fn folders(set: &RuleSet) -> Vec<&str> {
        set.iter().map(Rule::folder).collect()
    }

    #[test]
    fn empty() {
        let set = RuleSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn conflicting_rule_is_dropped() {
        let mut set = RuleSet::new();
        let definition = "subject-includes: mjt\nfrom: a@b.c";

        assert_eq!(set.add(rule("/inbox/a", 3, definition)), RuleOutcome::Added);
        assert_eq!(set.add(rule("/inbox/b", 3, definition)), RuleOutcome::Conflict);
        assert_eq!(set.len(), 1);
        assert_eq!(folders(&set), vec!["/inbox/a"]);
    }

    #[test]
    fn conflict_ignores_token_order() {
        let mut set = RuleSet::new();
        assert!(set.add(rule("/inbox/a", 2, "subject-includes: x, y")).is_added());
        assert!(!set.add(rule("/inbox/b", 2, "subject-includes: y ,x")).is_added());
    }

    #[test]
    fn same_folder_duplicate_is_kept() {
        let mut set = RuleSet::new();
        assert!(set.add(rule("/inbox/a", 3, "subject-includes: x")).is_added());
        assert!(set.add(rule("/inbox/a", 3, "subject-includes: x")).is_added());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn different_priority_is_not_a_conflict() {
        let mut set = RuleSet::new();
        assert!(set.add(rule("/inbox/a", 3, "subject-includes: x")).is_added());
        assert!(set.add(rule("/inbox/b", 4, "subject-includes: x")).is_added());
    }

    #[test]
    fn empty_criteria_conflict_too() {
        let mut set = RuleSet::new();
        let p = Priority::new(5).unwrap();
        assert!(set.add(Rule::new("/inbox/a", p, Criteria::default())).is_added());
        assert!(!set.add(Rule::new("/inbox/b", p, Criteria::default())).is_added());
    }

    #[test]
    fn ordered_by_priority_then_insertion() {
        let mut set = RuleSet::new();
        let _ = set.add(rule("/inbox/p4", 4, "subject-includes: a"));
        let _ = set.add(rule("/inbox/p2-first", 2, "subject-includes: b"));
        let _ = set.add(rule("/inbox/p10", 10, "subject-includes: c"));
        let _ = set.add(rule("/inbox/p2-second", 2, "subject-includes: d"));
        let _ = set.add(rule("/inbox/p1", 1, "subject-includes: e"));

        assert_eq!(
            folders(&set),
            vec![
                "/inbox/p1",
                "/inbox/p2-first",
                "/inbox/p2-second",
                "/inbox/p4",
                "/inbox/p10"
            ]
        );
        assert!(set.is_sorted());
    }

    #[test]
    fn into_iterator_matches_iter() {
        let mut set = RuleSet::new();
        let _ = set.add(rule("/inbox/a", 2, "subject-includes: a"));
        let _ = set.add(rule("/inbox/b", 1, "subject-includes: b"));

        let mut via_loop = Vec::new();
        for rule in &set {
            via_loop.push(rule.folder());
        }
        assert_eq!(via_loop, folders(&set));
    }

    proptest! {
        #[test]
        fn stays_sorted(priorities in prop::collection::vec(1u8..=10, 0..30)) {
            let mut set = RuleSet::new();
            for (i, priority) in priorities.iter().enumerate() {
                let added = set.add(rule(
                    &format!("/inbox/{i}"),
                    *priority,
                    &format!("subject-includes: token{i}"),
                ));
                prop_assert!(added.is_added());
            }
            prop_assert_eq!(set.len(), priorities.len());
            prop_assert!(set.is_sorted());
        }
    }
}
