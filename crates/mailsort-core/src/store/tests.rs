use super::*;

const GOSHO_MAIL: &str = concat!(
    "sender: gosho@abv.bg\n",
    "subject: Hello, MJT!\n",
    "recipients: pesho@gmail.com, gosho@abv.bg\n",
    "received: 2022-12-08 14:14",
);

const BODY: &str = "MJT course is the best course in FMI!";

fn store() -> MailStore {
    let mut store = MailStore::new();
    store.add_account("Nikolay", "niki@abv.bg").unwrap();
    store.add_account("Gosho", "gosho@abv.bg").unwrap();
    store
}

fn subjects(store: &MailStore, account: &str, path: &str) -> Vec<String> {
    store
        .mails_in(account, path)
        .unwrap()
        .iter()
        .map(|m| m.subject.clone())
        .collect()
}

mod account_tests {
    use super::*;

    #[test]
    fn add_account_successfully() {
        let mut store = store();
        let account = store.add_account("Ivan", "ivan@abv.bg").unwrap();
        assert_eq!(account, &Account::new("Ivan", "ivan@abv.bg"));

        let names: Vec<_> = store.accounts().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Gosho", "Ivan", "Nikolay"]);
    }

    #[test]
    fn new_account_has_only_default_folder() {
        let store = store();
        let folders: Vec<_> = store.mailbox("Nikolay").unwrap().folders().folders().collect();
        assert_eq!(folders, vec!["/inbox"]);
        assert!(store.rules("Nikolay").unwrap().is_empty());
    }

    #[test]
    fn blank_arguments_rejected() {
        let mut store = store();
        assert!(matches!(
            store.add_account("", "pesho@abv.bg"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            store.add_account("Ivan", "   "),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn duplicate_name_or_email_rejected() {
        let mut store = store();
        assert!(matches!(
            store.add_account("Nikolay", "other@abv.bg"),
            Err(Error::AccountAlreadyExists(_))
        ));
        assert!(matches!(
            store.add_account("Niki", "niki@abv.bg"),
            Err(Error::AccountAlreadyExists(_))
        ));
    }

    #[test]
    fn name_is_stored_as_given() {
        let mut store = MailStore::new();
        let account = store.add_account(" Niki ", "niki@abv.bg").unwrap();
        assert_eq!(account.name, " Niki ");

        store.create_folder(" Niki ", "/inbox/a").unwrap();
        assert!(store.folder_exists(" Niki ", "/inbox/a").unwrap());
        assert!(matches!(
            store.create_folder("Niki", "/inbox/b"),
            Err(Error::AccountNotFound(ref name)) if name == "Niki"
        ));
    }

    #[test]
    fn lookup_by_email() {
        let store = store();
        assert_eq!(store.account_by_email("gosho@abv.bg").unwrap().name, "Gosho");
        assert!(store.account_by_email("nobody@abv.bg").is_none());
    }
}

mod folder_tests {
    use super::*;

    #[test]
    fn create_folder_successfully() {
        let mut store = store();
        store.create_folder("Nikolay", "/inbox/doc").unwrap();
        assert!(store.folder_exists("Nikolay", "/inbox/doc").unwrap());
        assert!(!store.folder_exists("Gosho", "/inbox/doc").unwrap());
    }

    #[test]
    fn create_folder_blank_arguments() {
        let mut store = store();
        assert!(matches!(
            store.create_folder("Nikolay", ""),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            store.create_folder(" ", "/inbox/doc"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn create_folder_account_not_found() {
        let mut store = store();
        assert!(matches!(
            store.create_folder("Simeon", "/inbox/doc"),
            Err(Error::AccountNotFound(_))
        ));
    }

    #[test]
    fn create_folder_invalid_paths() {
        let mut store = store();
        assert!(matches!(
            store.create_folder("Nikolay", "/inbox/important/documents"),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            store.create_folder("Nikolay", "/important/documents"),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            store.create_folder("Nikolay", "/sent"),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn create_folder_already_exists() {
        let mut store = store();
        store.create_folder("Nikolay", "/inbox/documents").unwrap();
        assert!(matches!(
            store.create_folder("Nikolay", "/inbox/documents"),
            Err(Error::FolderAlreadyExists(_))
        ));
    }

    #[test]
    fn sent_folder_always_exists() {
        let store = store();
        assert!(store.folder_exists("Nikolay", "/sent").unwrap());
        assert!(store.mails_in("Nikolay", "/sent").unwrap().is_empty());
    }

    #[test]
    fn mails_in_errors() {
        let store = store();
        assert!(matches!(
            store.mails_in("", "/inbox"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            store.mails_in("Nikolay", ""),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            store.mails_in("Simeon", "/inbox"),
            Err(Error::AccountNotFound(_))
        ));
        assert!(matches!(
            store.mails_in("Nikolay", "/inbox/mjt"),
            Err(Error::FolderNotFound(_))
        ));
    }
}

mod rule_tests {
    use super::*;

    const DEFINITION: &str = "subject-includes: mjt, izpit, 2022\nsubject-or-body-includes: izpit\nfrom: niki@abv.bg";

    #[test]
    fn blank_arguments_rejected() {
        let mut store = store();
        assert!(matches!(
            store.add_rule("", "/inbox", DEFINITION, 3),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            store.add_rule("Nikolay", "", DEFINITION, 3),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            store.add_rule("Nikolay", "/inbox", " ", 3),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn priority_out_of_range() {
        let mut store = store();
        assert!(matches!(
            store.add_rule("Nikolay", "/inbox", DEFINITION, 0),
            Err(Error::InvalidPriority(0))
        ));
        assert!(matches!(
            store.add_rule("Nikolay", "/inbox", DEFINITION, 11),
            Err(Error::InvalidPriority(11))
        ));
    }

    #[test]
    fn account_not_found() {
        let mut store = store();
        assert!(matches!(
            store.add_rule("Pesho", "/inbox/doc", DEFINITION, 3),
            Err(Error::AccountNotFound(_))
        ));
    }

    #[test]
    fn folder_not_found() {
        let mut store = store();
        assert!(matches!(
            store.add_rule("Nikolay", "/inbox/doc", DEFINITION, 3),
            Err(Error::FolderNotFound(_))
        ));
    }

    #[test]
    fn duplicate_keyword() {
        let mut store = store();
        store.create_folder("Nikolay", "/inbox/doc").unwrap();
        assert!(matches!(
            store.add_rule(
                "Nikolay",
                "/inbox/doc",
                "subject-includes: a\nsubject-includes: b",
                3
            ),
            Err(Error::RuleAlreadyDefined(_))
        ));
        assert!(store.rules("Nikolay").unwrap().is_empty());
    }

    #[test]
    fn conflicting_rule_not_added() {
        let mut store = store();
        store.create_folder("Nikolay", "/inbox/documents").unwrap();
        store
            .create_folder("Nikolay", "/inbox/documents/important")
            .unwrap();

        let first = store
            .add_rule("Nikolay", "/inbox/documents", DEFINITION, 2)
            .unwrap();
        let second = store
            .add_rule("Nikolay", "/inbox/documents/important", DEFINITION, 2)
            .unwrap();

        assert_eq!(first, RuleOutcome::Added);
        assert_eq!(second, RuleOutcome::Conflict);

        let rules = store.rules("Nikolay").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.iter().next().unwrap().folder(), "/inbox/documents");
    }

    #[test]
    fn adding_rule_moves_matching_inbox_mail() {
        let mut store = store();
        store.receive_mail("Nikolay", GOSHO_MAIL, BODY).unwrap();
        assert_eq!(subjects(&store, "Nikolay", "/inbox"), vec!["Hello, MJT!"]);

        store.create_folder("Nikolay", "/inbox/documents").unwrap();
        let outcome = store
            .add_rule(
                "Nikolay",
                "/inbox/documents",
                "subject-includes: MJT\nsubject-or-body-includes: best, course",
                2,
            )
            .unwrap();

        assert!(outcome.is_added());
        assert!(subjects(&store, "Nikolay", "/inbox").is_empty());
        assert_eq!(
            subjects(&store, "Nikolay", "/inbox/documents"),
            vec!["Hello, MJT!"]
        );
    }

    #[test]
    fn strict_settings_reject_unknown_keywords() {
        let mut store = MailStore::with_settings(Settings {
            strict_rules: true,
            ..Settings::default()
        })
        .unwrap();
        store.add_account("Nikolay", "niki@abv.bg").unwrap();

        assert!(matches!(
            store.add_rule("Nikolay", "/inbox", "body-includes: x", 1),
            Err(Error::InvalidRuleDefinition(_))
        ));
    }

    #[test]
    fn lenient_settings_ignore_unknown_keywords() {
        let mut store = store();
        let outcome = store
            .add_rule("Nikolay", "/inbox", "body-includes: x\nsubject-includes: y", 1)
            .unwrap();
        assert!(outcome.is_added());
    }
}

mod receive_tests {
    use super::*;

    #[test]
    fn blank_arguments_rejected() {
        let mut store = store();
        assert!(matches!(
            store.receive_mail("", GOSHO_MAIL, BODY),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            store.receive_mail("Gosho", "", BODY),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            store.receive_mail("Gosho", GOSHO_MAIL, " "),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn account_not_found() {
        let mut store = store();
        assert!(matches!(
            store.receive_mail("Rosi", GOSHO_MAIL, BODY),
            Err(Error::AccountNotFound(_))
        ));
    }

    #[test]
    fn bad_timestamp_is_a_metadata_error() {
        let mut store = store();
        assert!(matches!(
            store.receive_mail("Nikolay", "sender: a@b.c\nreceived: soon", BODY),
            Err(Error::Metadata(_))
        ));
    }

    #[test]
    fn no_rules_goes_to_default() {
        let mut store = store();
        let folder = store.receive_mail("Nikolay", GOSHO_MAIL, BODY).unwrap();
        assert_eq!(folder, "/inbox");

        let mail = &store.mails_in("Nikolay", "/inbox").unwrap()[0];
        assert_eq!(mail.sender, Account::new("Gosho", "gosho@abv.bg"));
        assert_eq!(mail.body, BODY);
        assert!(mail.received.is_some());
    }

    #[test]
    fn unknown_sender_becomes_external_account() {
        let mut store = store();
        store
            .receive_mail("Nikolay", "sender: stranger@x.com\nsubject: hi", BODY)
            .unwrap();
        let mail = &store.mails_in("Nikolay", "/inbox").unwrap()[0];
        assert_eq!(mail.sender, Account::external("stranger@x.com"));
    }

    #[test]
    fn no_rule_match() {
        let mut store = store();
        store.create_folder("Nikolay", "/inbox/documents").unwrap();
        let _ = store
            .add_rule(
                "Nikolay",
                "/inbox/documents",
                "subject-includes: MJT, exam\nsubject-or-body-includes: best\nfrom: gosho@abv.bg",
                2,
            )
            .unwrap();

        store.receive_mail("Nikolay", GOSHO_MAIL, BODY).unwrap();
        assert_eq!(subjects(&store, "Nikolay", "/inbox"), vec!["Hello, MJT!"]);
        assert!(subjects(&store, "Nikolay", "/inbox/documents").is_empty());
    }

    #[test]
    fn rule_match() {
        let mut store = store();
        store.create_folder("Nikolay", "/inbox/documents").unwrap();
        let _ = store
            .add_rule(
                "Nikolay",
                "/inbox/documents",
                "subject-includes: MJT\nsubject-or-body-includes: best, course\nfrom: gosho@abv.bg",
                2,
            )
            .unwrap();

        let folder = store.receive_mail("Nikolay", GOSHO_MAIL, BODY).unwrap();
        assert_eq!(folder, "/inbox/documents");
        assert!(subjects(&store, "Nikolay", "/inbox").is_empty());
    }

    #[test]
    fn higher_priority_rule_wins() {
        let mut store = store();
        store.create_folder("Nikolay", "/inbox/documents").unwrap();
        store.create_folder("Nikolay", "/inbox/newFolder").unwrap();
        let _ = store
            .add_rule(
                "Nikolay",
                "/inbox/documents",
                "subject-includes: MJT\nsubject-or-body-includes: best, course\nfrom: gosho@abv.bg",
                4,
            )
            .unwrap();
        let _ = store
            .add_rule(
                "Nikolay",
                "/inbox/newFolder",
                "subject-includes: Hello\nsubject-or-body-includes: best, course, MJT\nrecipients-includes: simeon@abv.bg, pesho@gmail.com, stelio@gmail.com",
                2,
            )
            .unwrap();

        store
            .receive_mail(
                "Nikolay",
                GOSHO_MAIL,
                "Modern Java Technologies is the best course in FMI!",
            )
            .unwrap();

        assert_eq!(
            subjects(&store, "Nikolay", "/inbox/newFolder"),
            vec!["Hello, MJT!"]
        );
        assert!(subjects(&store, "Nikolay", "/inbox/documents").is_empty());
    }

    #[test]
    fn route_incoming_does_not_place() {
        let mut store = store();
        store.create_folder("Nikolay", "/inbox/documents").unwrap();
        let _ = store
            .add_rule("Nikolay", "/inbox/documents", "subject-includes: MJT", 1)
            .unwrap();

        let mail = Mail::new(
            Account::new("Gosho", "gosho@abv.bg"),
            ["niki@abv.bg"],
            "MJT",
            "",
            None,
        );
        assert_eq!(
            store.route_incoming("Nikolay", &mail).unwrap(),
            "/inbox/documents"
        );
        assert_eq!(store.mailbox("Nikolay").unwrap().folders().mail_count(), 0);

        assert!(matches!(
            store.route_incoming("Nobody", &mail),
            Err(Error::AccountNotFound(_))
        ));
    }
}

mod send_tests {
    use super::*;

    #[test]
    fn sent_mail_is_logged_with_real_sender() {
        let mut store = store();
        let metadata = "sender: forged@evil.com\nsubject: Hi\nrecipients: pesho@gmail.com";

        let delivered = store.send_mail("Gosho", metadata, BODY).unwrap();
        assert_eq!(delivered, 0);

        let sent = store.mails_in("Gosho", "/sent").unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].sender_email(), "gosho@abv.bg");
        assert_eq!(store.mailbox("Gosho").unwrap().sent(), sent);
        assert!(store.mailbox("Nikolay").unwrap().sent().is_empty());
    }

    #[test]
    fn local_recipients_receive_a_copy() {
        let mut store = store();
        store.add_account("Ivan", "ivan@abv.bg").unwrap();
        store.create_folder("Ivan", "/inbox/friends").unwrap();
        let _ = store
            .add_rule(
                "Ivan",
                "/inbox/friends",
                "recipients-includes: ivan@abv.bg\nfrom: gosho@abv.bg",
                1,
            )
            .unwrap();

        let metadata = "subject: Party\nrecipients: niki@abv.bg, ivan@abv.bg, pesho@gmail.com";
        let delivered = store.send_mail("Gosho", metadata, "Saturday").unwrap();

        assert_eq!(delivered, 2);
        assert_eq!(subjects(&store, "Nikolay", "/inbox"), vec!["Party"]);
        assert_eq!(subjects(&store, "Ivan", "/inbox/friends"), vec!["Party"]);
        assert!(subjects(&store, "Ivan", "/inbox").is_empty());
        assert_eq!(subjects(&store, "Gosho", "/sent"), vec!["Party"]);
        assert!(subjects(&store, "Gosho", "/inbox").is_empty());
    }

    #[test]
    fn errors() {
        let mut store = store();
        assert!(matches!(
            store.send_mail("Nobody", GOSHO_MAIL, BODY),
            Err(Error::AccountNotFound(_))
        ));
        assert!(matches!(
            store.send_mail("Gosho", GOSHO_MAIL, ""),
            Err(Error::InvalidArgument(_))
        ));
    }
}

mod settings_tests {
    use super::*;

    #[test]
    fn custom_folder_names() {
        let settings = Settings {
            default_folder: "/mail".to_string(),
            sent_folder: "/outbox".to_string(),
            strict_rules: false,
        };
        let mut store = MailStore::with_settings(settings).unwrap();
        assert_eq!(store.settings().sent_folder, "/outbox");
        assert!(MailStore::new().settings().validate().is_ok());
        store.add_account("Nikolay", "niki@abv.bg").unwrap();

        store.create_folder("Nikolay", "/mail/work").unwrap();
        assert!(matches!(
            store.create_folder("Nikolay", "/inbox/work"),
            Err(Error::InvalidPath { .. })
        ));
        assert!(store.mails_in("Nikolay", "/outbox").unwrap().is_empty());
        assert_eq!(
            store
                .receive_mail("Nikolay", "sender: a@b.c\nsubject: x", "y")
                .unwrap(),
            "/mail"
        );
    }

    #[test]
    fn invalid_settings_rejected() {
        let settings = Settings {
            default_folder: "mail".to_string(),
            ..Settings::default()
        };
        assert!(matches!(
            MailStore::with_settings(settings),
            Err(Error::Config(_))
        ));
    }
}
