//! In-memory account directory and mail store.
//!
//! [`MailStore`] owns every account together with its folder tree, rule set
//! and sent log, and drives the routing engine on each inbound and outbound
//! mail. It is a plain value: create one with [`MailStore::new`] and pass it
//! around; mutating calls take `&mut self`, so callers sharing a store across
//! threads wrap it in their own lock.

mod mailbox;

use std::collections::{BTreeMap, HashMap};

use mailsort_meta::Metadata;
use tracing::{debug, info};

use crate::account::{Account, ValidationError, validate_account};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::mail::Mail;
use crate::routing::{best_folder_for, reclassify};
use crate::rule::{ParseMode, Priority, Rule, RuleOutcome, RuleSet, parse_definition};

pub use mailbox::Mailbox;

/// Accounts, their folders, rules and sent mail.
#[derive(Debug, Clone, Default)]
pub struct MailStore {
    settings: Settings,
    mailboxes: BTreeMap<String, Mailbox>,
    names_by_email: HashMap<String, String>,
}

impl MailStore {
    /// Create an empty store with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with custom settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the settings do not validate.
    pub fn with_settings(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a new account. It starts with an empty default folder.
    ///
    /// The name and email are stored exactly as given and later lookups must
    /// use the same strings.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the name or email is blank or the
    ///   email is malformed.
    /// - [`Error::AccountAlreadyExists`] if the name or email is taken.
    pub fn add_account(&mut self, name: &str, email: &str) -> Result<&Account> {
        let account = Account::new(name, email);
        if let Err(errors) = validate_account(&account) {
            return Err(Error::InvalidArgument(
                errors
                    .first()
                    .map_or("invalid account", ValidationError::message),
            ));
        }

        if self.mailboxes.contains_key(&account.name) {
            return Err(Error::AccountAlreadyExists(account.name));
        }
        if self.names_by_email.contains_key(&account.email) {
            return Err(Error::AccountAlreadyExists(account.email));
        }

        info!(name = %account.name, email = %account.email, "Account added");

        let name = account.name.clone();
        self.names_by_email.insert(account.email.clone(), name.clone());
        let mailbox = Mailbox::new(account, &self.settings.default_folder);
        Ok(&self.mailboxes.entry(name).or_insert(mailbox).account)
    }

    /// Look up an account by name.
    #[must_use]
    pub fn account(&self, name: &str) -> Option<&Account> {
        self.mailboxes.get(name).map(Mailbox::account)
    }

    /// Look up an account by email address.
    #[must_use]
    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.names_by_email
            .get(email)
            .and_then(|name| self.account(name))
    }

    /// All accounts, sorted by name.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.mailboxes.values().map(Mailbox::account)
    }

    /// Full state of one account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`] for unknown names.
    pub fn mailbox(&self, name: &str) -> Result<&Mailbox> {
        self.mailboxes
            .get(name)
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))
    }

    fn mailbox_mut(&mut self, name: &str) -> Result<&mut Mailbox> {
        self.mailboxes
            .get_mut(name)
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))
    }

    /// Rules of an account, in precedence order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`] for unknown names.
    pub fn rules(&self, account: &str) -> Result<&RuleSet> {
        Ok(&self.mailbox(account)?.rules)
    }

    /// Whether `path` exists for `account`. The sent folder always exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`] for unknown names.
    pub fn folder_exists(&self, account: &str, path: &str) -> Result<bool> {
        let mailbox = self.mailbox(account)?;
        Ok(path == self.settings.sent_folder || mailbox.folders.exists(path))
    }

    /// Create a folder in an account's tree.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for blank arguments.
    /// - [`Error::AccountNotFound`] for unknown accounts.
    /// - [`Error::FolderAlreadyExists`] / [`Error::InvalidPath`] from the tree.
    pub fn create_folder(&mut self, account: &str, path: &str) -> Result<()> {
        require_text(account, "Account can not be empty or blank")?;
        require_text(path, "Path can not be empty or blank")?;

        self.mailbox_mut(account)?.folders.create_folder(path)?;
        info!(account, path, "Folder created");
        Ok(())
    }

    /// Compile and add a rule, then reclassify the default folder.
    ///
    /// A rule equivalent to an existing one at the same priority but routing
    /// to another folder is not added; [`RuleOutcome::Conflict`] is returned
    /// and nothing is reclassified.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for blank arguments.
    /// - [`Error::InvalidPriority`] if `priority` is outside 1..=10.
    /// - [`Error::AccountNotFound`] / [`Error::FolderNotFound`].
    /// - [`Error::RuleAlreadyDefined`] / [`Error::InvalidRuleDefinition`]
    ///   from the parser.
    pub fn add_rule(
        &mut self,
        account: &str,
        folder: &str,
        definition: &str,
        priority: u8,
    ) -> Result<RuleOutcome> {
        require_text(account, "Account can not be empty or blank")?;
        require_text(folder, "Path can not be empty or blank")?;
        require_text(definition, "Rule definition can not be empty or blank")?;
        let priority = Priority::new(priority)?;

        let mode = if self.settings.strict_rules {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        };

        let mailbox = self.mailbox_mut(account)?;
        if !mailbox.folders.exists(folder) {
            return Err(Error::FolderNotFound(folder.to_string()));
        }

        let criteria = parse_definition(definition, mode)?;
        let outcome = mailbox.rules.add(Rule::new(folder, priority, criteria));

        match outcome {
            RuleOutcome::Added => {
                let moved = reclassify(&mut mailbox.folders, &mailbox.rules);
                info!(account, folder, %priority, moved, "Rule added");
            }
            RuleOutcome::Conflict => {
                info!(account, folder, %priority, "Conflicting rule ignored");
            }
        }

        Ok(outcome)
    }

    /// Folder a freshly received mail would be placed in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`] for unknown accounts.
    pub fn route_incoming(&self, account: &str, mail: &Mail) -> Result<&str> {
        let mailbox = self.mailbox(account)?;
        Ok(best_folder_for(
            mail,
            &mailbox.rules,
            mailbox.folders.default_folder(),
        ))
    }

    /// Route `mail` and place it directly in its destination folder.
    ///
    /// Returns the destination path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`] for unknown accounts.
    pub fn receive(&mut self, account: &str, mail: Mail) -> Result<String> {
        let mailbox = self.mailbox_mut(account)?;
        let target =
            best_folder_for(&mail, &mailbox.rules, mailbox.folders.default_folder()).to_string();

        debug!(account, folder = %target, subject = %mail.subject, "Mail received");
        mailbox.folders.place(&target, mail)?;
        Ok(target)
    }

    /// Parse raw metadata and content into a mail and receive it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for blank arguments.
    /// - [`Error::AccountNotFound`] for unknown accounts.
    /// - [`Error::Metadata`] if the metadata does not parse.
    pub fn receive_mail(&mut self, account: &str, metadata: &str, content: &str) -> Result<String> {
        require_text(account, "Account can not be empty or blank")?;
        require_text(metadata, "Mail metadata can not be empty or blank")?;
        require_text(content, "Mail content can not be empty or blank")?;
        self.mailbox(account)?;

        let metadata = Metadata::parse(metadata)?;
        let sender = self.resolve_sender(metadata.sender.as_deref().unwrap_or_default());
        self.receive(account, Mail::from_metadata(sender, metadata, content))
    }

    /// Send a mail from `account`.
    ///
    /// The sender is always the sending account, whatever the metadata says.
    /// The mail is logged in the sender's sent folder and delivered to every
    /// recipient registered in this store. Returns the number of local
    /// deliveries.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for blank arguments.
    /// - [`Error::AccountNotFound`] for unknown accounts.
    /// - [`Error::Metadata`] if the metadata does not parse.
    pub fn send_mail(&mut self, account: &str, metadata: &str, content: &str) -> Result<usize> {
        require_text(account, "Account can not be empty or blank")?;
        require_text(metadata, "Mail metadata can not be empty or blank")?;
        require_text(content, "Mail content can not be empty or blank")?;

        let sender = self.mailbox(account)?.account.clone();
        let metadata = Metadata::parse(metadata)?.with_sender(sender.email.clone());
        let mail = Mail::from_metadata(sender, metadata, content);

        let local: Vec<String> = mail
            .recipients
            .iter()
            .filter_map(|address| self.names_by_email.get(address).cloned())
            .collect();

        for recipient in &local {
            self.receive(recipient, mail.clone())?;
        }

        info!(
            account,
            recipients = mail.recipients.len(),
            delivered = local.len(),
            "Mail sent"
        );
        self.mailbox_mut(account)?.sent.push(mail);

        Ok(local.len())
    }

    /// Mail in one folder of an account. The sent folder yields the sent log.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for blank arguments.
    /// - [`Error::AccountNotFound`] / [`Error::FolderNotFound`].
    pub fn mails_in(&self, account: &str, path: &str) -> Result<&[Mail]> {
        require_text(account, "Account can not be empty or blank")?;
        require_text(path, "Path can not be empty or blank")?;

        let mailbox = self.mailbox(account)?;
        if path == self.settings.sent_folder {
            return Ok(&mailbox.sent);
        }
        mailbox.folders.mails_in(path)
    }

    fn resolve_sender(&self, email: &str) -> Account {
        self.account_by_email(email)
            .cloned()
            .unwrap_or_else(|| Account::external(email))
    }
}

fn require_text(value: &str, message: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(message));
    }
    Ok(())
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
mod tests;
