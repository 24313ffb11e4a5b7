//! End-to-end routing behaviour through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use mailsort_core::{
    Account, Criteria, Error, FolderTree, Mail, MailStore, ParseMode, Priority, Rule,
    RuleOutcome, RuleSet, best_folder_for, parse_definition, reclassify,
};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsort_core=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn rule(folder: &str, priority: u8, definition: &str) -> Rule {
    Rule::new(
        folder,
        Priority::new(priority).unwrap(),
        parse_definition(definition, ParseMode::Lenient).unwrap(),
    )
}

fn mail(sender: &str, subject: &str, body: &str) -> Mail {
    Mail::new(
        Account::external(sender),
        ["niki@x", "pesho@gmail.com"],
        subject,
        body,
        None,
    )
}

#[test]
fn create_then_exists_and_recreate_fails() {
    init_tracing();
    let mut tree = FolderTree::new("/inbox");

    tree.create_folder("/inbox/a").unwrap();
    assert!(tree.exists("/inbox/a"));
    assert!(matches!(
        tree.create_folder("/inbox/a"),
        Err(Error::FolderAlreadyExists(_))
    ));
}

#[test]
fn invalid_paths() {
    init_tracing();
    let mut tree = FolderTree::new("/inbox");

    assert!(matches!(
        tree.create_folder("/other/x"),
        Err(Error::InvalidPath { .. })
    ));
    assert!(matches!(
        tree.create_folder("/inbox/a/b"),
        Err(Error::InvalidPath { .. })
    ));
}

#[test]
fn from_only_rule_never_matches_even_on_exact_sender() {
    let rule = rule("/inbox/x", 1, "from: gosho@x");
    assert!(!rule.matches(&mail("gosho@x", "anything", "anything")));
}

#[test]
fn conflicting_rules_keep_set_size_one() {
    let mut rules = RuleSet::new();
    let definition = "subject-includes: a, b\nrecipients-includes: niki@x";

    assert_eq!(rules.add(rule("/inbox/one", 3, definition)), RuleOutcome::Added);
    assert_eq!(rules.add(rule("/inbox/two", 3, definition)), RuleOutcome::Conflict);
    assert_eq!(rules.len(), 1);
}

#[test]
fn priority_two_beats_priority_four() {
    let mut rules = RuleSet::new();
    let _ = rules.add(rule("/inbox/a", 4, "subject-includes: MJT"));
    let _ = rules.add(rule("/inbox/b", 2, "subject-includes: MJT"));

    let mail = mail("gosho@x", "Hello, MJT!", "");
    assert_eq!(best_folder_for(&mail, &rules, "/inbox"), "/inbox/b");
}

#[test]
fn end_to_end_reclassification() {
    init_tracing();
    let mut store = MailStore::new();
    store.add_account("Nikolay", "niki@x").unwrap();
    store
        .receive(
            "Nikolay",
            mail("gosho@x", "Hello, MJT!", "the best course there is"),
        )
        .unwrap();

    store.create_folder("Nikolay", "/inbox/documents").unwrap();
    let outcome = store
        .add_rule(
            "Nikolay",
            "/inbox/documents",
            "subject-includes: MJT\nsubject-or-body-includes: best, course",
            3,
        )
        .unwrap();

    assert!(outcome.is_added());
    assert!(store.mails_in("Nikolay", "/inbox").unwrap().is_empty());
    assert_eq!(store.mails_in("Nikolay", "/inbox/documents").unwrap().len(), 1);
}

#[test]
fn sender_mismatch_short_circuits() {
    let rule = rule(
        "/inbox/documents",
        1,
        "from: niki@x\nsubject-includes: MJT\nrecipients-includes: niki@x",
    );
    assert!(!rule.matches(&mail("gosho@x", "Hello, MJT!", "")));
}

#[test]
fn reclassify_twice_equals_once() {
    let mut tree = FolderTree::new("/inbox");
    tree.create_folder("/inbox/a").unwrap();
    tree.create_folder("/inbox/b").unwrap();
    for subject in ["alpha", "beta", "gamma", "alphabet"] {
        tree.place("/inbox", mail("gosho@x", subject, "")).unwrap();
    }

    let mut rules = RuleSet::new();
    let _ = rules.add(rule("/inbox/a", 5, "subject-includes: alpha"));
    let _ = rules.add(rule("/inbox/b", 5, "subject-includes: bet"));

    reclassify(&mut tree, &rules);
    let snapshot = tree.clone();
    reclassify(&mut tree, &rules);

    for folder in snapshot.folders() {
        assert_eq!(
            snapshot.mails_in(folder).unwrap(),
            tree.mails_in(folder).unwrap()
        );
    }
    // "alphabet" matches both; the earlier rule wins.
    assert_eq!(tree.mails_in("/inbox/a").unwrap().len(), 2);
    assert_eq!(tree.mails_in("/inbox/b").unwrap().len(), 1);
}

fn criteria_strategy() -> impl Strategy<Value = String> {
    let tokens = || prop::collection::vec("[a-c]{1,2}", 0..3).prop_map(|t| t.join(", "));
    (tokens(), tokens(), prop::option::of("[a-c]@x")).prop_map(|(subject, either, from)| {
        let mut lines = Vec::new();
        if !subject.is_empty() {
            lines.push(format!("subject-includes: {subject}"));
        }
        if !either.is_empty() {
            lines.push(format!("subject-or-body-includes: {either}"));
        }
        if let Some(from) = from {
            lines.push(format!("from: {from}"));
        }
        lines.join("\n")
    })
}

proptest! {
    #[test]
    fn routing_is_deterministic_and_reclassify_idempotent(
        definitions in prop::collection::vec((criteria_strategy(), 1u8..=3), 0..6),
        subjects in prop::collection::vec(("[a-c ]{0,6}", "[a-c ]{0,6}", "[a-c]@x"), 0..8),
    ) {
        let mut tree = FolderTree::new("/inbox");
        let mut rules = RuleSet::new();
        for (i, (definition, priority)) in definitions.iter().enumerate() {
            let folder = format!("/inbox/{i}");
            tree.create_folder(&folder).unwrap();
            let _ = rules.add(rule(&folder, *priority, definition));
        }
        for (subject, body, sender) in &subjects {
            tree.place("/inbox", mail(sender, subject, body)).unwrap();
        }

        for m in tree.mails_in("/inbox").unwrap() {
            let first = best_folder_for(m, &rules, "/inbox");
            prop_assert_eq!(first, best_folder_for(m, &rules, "/inbox"));
        }

        reclassify(&mut tree, &rules);
        let once = tree.clone();
        prop_assert_eq!(reclassify(&mut tree, &rules), 0);
        for folder in once.folders() {
            prop_assert_eq!(once.mails_in(folder).unwrap(), tree.mails_in(folder).unwrap());
        }
        prop_assert_eq!(once.mail_count(), subjects.len());
    }

    #[test]
    fn empty_criteria_never_match(subject in ".{0,12}", body in ".{0,12}") {
        let rule = Rule::new("/inbox/x", Priority::HIGHEST, Criteria::default());
        prop_assert!(!rule.matches(&mail("a@x", &subject, &body)));
    }
}
