//! Mail routing.
//!
//! [`best_folder_for`] picks the destination of a single mail: the folder of
//! the first matching rule in precedence order, or the default folder.
//! [`reclassify`] re-runs that choice over the default folder after the rule
//! set changes and moves every mail that now belongs elsewhere. Mail already
//! outside the default folder is never re-evaluated.

use tracing::{debug, warn};

use crate::folder::FolderTree;
use crate::mail::Mail;
use crate::rule::RuleSet;

/// Destination folder for `mail`.
///
/// Returns the folder of the first rule in `rules` that matches, or
/// `default_folder` when none does. The result only depends on the rule set
/// and the mail.
#[must_use]
pub fn best_folder_for<'a>(mail: &Mail, rules: &'a RuleSet, default_folder: &'a str) -> &'a str {
    rules
        .iter()
        .find(|rule| rule.matches(mail))
        .map_or(default_folder, |rule| rule.folder())
}

/// Move default-folder mail that now matches a rule into that rule's folder.
///
/// Mail that stays keeps its relative order; moved mail is appended to its
/// destination. Returns how many mails moved. Running it twice without
/// changing `rules` moves nothing the second time.
pub fn reclassify(tree: &mut FolderTree, rules: &RuleSet) -> usize {
    let default_folder = tree.default_folder().to_string();
    let inbox = tree
        .folder_mut(&default_folder)
        .map(std::mem::take)
        .unwrap_or_default();

    let mut kept = Vec::with_capacity(inbox.len());
    let mut moved = 0;

    for mail in inbox {
        let target = best_folder_for(&mail, rules, &default_folder);
        if target == default_folder {
            kept.push(mail);
            continue;
        }

        if let Some(folder) = tree.folder_mut(target) {
            debug!(from = %default_folder, to = target, subject = %mail.subject, "Reclassified mail");
            folder.push(mail);
            moved += 1;
        } else {
            warn!(folder = target, "Rule targets a missing folder, keeping mail in place");
            kept.push(mail);
        }
    }

    if let Some(folder) = tree.folder_mut(&default_folder) {
        *folder = kept;
    }

    moved
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
    use crate::rule::{Criteria, ParseMode, Priority, Rule, parse_definition};

    fn mail(subject: &str, body: &str) -> Mail {
        Mail::new(
            Account::new("Nikolay", "niki@abv.bg"),
            ["stoyo@gmail.com", "ivan@abv.bg"],
            subject,
            body,
            None,
        )
    }

    fn rule(folder: &str, priority: u8, definition: &str) -> Rule {
        Rule::new(
            folder,
            Priority::new(priority).unwrap(),
            parse_definition(definition, ParseMode::Lenient).unwrap(),
        )
    }

    fn subjects(tree: &FolderTree, path: &str) -> Vec<String> {
        tree.mails_in(path)
            .unwrap()
            .iter()
            .map(|m| m.subject.clone())
            .collect()
    }

    mod best_folder_tests {
        use super::*;

        #[test]
        fn matched_rule_wins() {
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/important", 3, "subject-includes: final"));

            let mail = mail("football world cup final", "");
            assert_eq!(best_folder_for(&mail, &rules, "/inbox"), "/inbox/important");
        }

        #[test]
        fn no_match_goes_to_default() {
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/important", 3, "subject-includes: tennis"));

            let mail = mail("football world cup final", "");
            assert_eq!(best_folder_for(&mail, &rules, "/inbox"), "/inbox");
            assert_eq!(best_folder_for(&mail, &RuleSet::new(), "/inbox"), "/inbox");
        }

        #[test]
        fn higher_precedence_wins() {
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/a", 4, "subject-includes: final"));
            let _ = rules.add(rule("/inbox/b", 2, "subject-or-body-includes: final"));

            let mail = mail("football world cup final", "");
            assert_eq!(best_folder_for(&mail, &rules, "/inbox"), "/inbox/b");
        }

        #[test]
        fn ties_go_to_earliest_rule() {
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/first", 5, "subject-includes: final"));
            let _ = rules.add(rule("/inbox/second", 5, "subject-includes: cup"));

            let mail = mail("football world cup final", "");
            for _ in 0..10 {
                assert_eq!(best_folder_for(&mail, &rules, "/inbox"), "/inbox/first");
            }
        }

        #[test]
        fn empty_rule_is_skipped() {
            let mut rules = RuleSet::new();
            let _ = rules.add(Rule::new("/inbox/void", Priority::HIGHEST, Criteria::default()));
            let _ = rules.add(rule("/inbox/real", 9, "subject-includes: final"));

            let mail = mail("football world cup final", "");
            assert_eq!(best_folder_for(&mail, &rules, "/inbox"), "/inbox/real");
        }
    }

    mod reclassify_tests {
        use super::*;

        fn tree_with(subjects: &[&str]) -> FolderTree {
            let mut tree = FolderTree::new("/inbox");
            tree.create_folder("/inbox/important").unwrap();
            tree.create_folder("/inbox/other").unwrap();
            for subject in subjects {
                tree.place("/inbox", mail(subject, "")).unwrap();
            }
            tree
        }

        #[test]
        fn moves_matching_mail() {
            let mut tree = tree_with(&["football world cup final"]);
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/important", 3, "subject-includes: final"));

            assert_eq!(reclassify(&mut tree, &rules), 1);
            assert!(tree.mails_in("/inbox").unwrap().is_empty());
            assert_eq!(subjects(&tree, "/inbox/important"), vec!["football world cup final"]);
        }

        #[test]
        fn preserves_order_of_kept_and_moved() {
            let mut tree = tree_with(&["keep 1", "move 1", "keep 2", "move 2", "keep 3"]);
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/important", 3, "subject-includes: move"));

            assert_eq!(reclassify(&mut tree, &rules), 2);
            assert_eq!(subjects(&tree, "/inbox"), vec!["keep 1", "keep 2", "keep 3"]);
            assert_eq!(subjects(&tree, "/inbox/important"), vec!["move 1", "move 2"]);
        }

        #[test]
        fn appends_after_existing_destination_mail() {
            let mut tree = tree_with(&["move me"]);
            tree.place("/inbox/important", mail("already here", "")).unwrap();
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/important", 3, "subject-includes: move"));

            reclassify(&mut tree, &rules);
            assert_eq!(
                subjects(&tree, "/inbox/important"),
                vec!["already here", "move me"]
            );
        }

        #[test]
        fn idempotent() {
            let mut tree = tree_with(&["a final", "b", "c cup"]);
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/important", 3, "subject-includes: final"));
            let _ = rules.add(rule("/inbox/other", 4, "subject-includes: cup"));

            assert_eq!(reclassify(&mut tree, &rules), 2);
            let once: Vec<_> = tree
                .folders()
                .map(|f| (f.to_string(), subjects(&tree, f)))
                .collect();

            assert_eq!(reclassify(&mut tree, &rules), 0);
            let twice: Vec<_> = tree
                .folders()
                .map(|f| (f.to_string(), subjects(&tree, f)))
                .collect();
            assert_eq!(once, twice);
        }

        #[test]
        fn never_touches_mail_outside_default() {
            let mut tree = tree_with(&[]);
            tree.place("/inbox/other", mail("final", "")).unwrap();
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/important", 1, "subject-includes: final"));

            assert_eq!(reclassify(&mut tree, &rules), 0);
            assert_eq!(subjects(&tree, "/inbox/other"), vec!["final"]);
            assert!(tree.mails_in("/inbox/important").unwrap().is_empty());
        }

        #[test]
        fn missing_target_keeps_mail() {
            let mut tree = tree_with(&["final"]);
            let mut rules = RuleSet::new();
            let _ = rules.add(rule("/inbox/gone", 1, "subject-includes: final"));

            assert_eq!(reclassify(&mut tree, &rules), 0);
            assert_eq!(subjects(&tree, "/inbox"), vec!["final"]);
        }
    }
}
