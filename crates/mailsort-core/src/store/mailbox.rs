//! Per-account state.

use crate::account::Account;
use crate::folder::FolderTree;
use crate::mail::Mail;
use crate::rule::RuleSet;

/// Everything the store keeps for one account.
#[derive(Debug, Clone)]
pub struct Mailbox {
    pub(crate) account: Account,
    pub(crate) folders: FolderTree,
    pub(crate) rules: RuleSet,
    pub(crate) sent: Vec<Mail>,
}

impl Mailbox {
    pub(crate) fn new(account: Account, default_folder: &str) -> Self {
        Self {
            account,
            folders: FolderTree::new(default_folder),
            rules: RuleSet::new(),
            sent: Vec::new(),
        }
    }

    /// Owning account.
    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    /// Received mail, by folder.
    #[must_use]
    pub const fn folders(&self) -> &FolderTree {
        &self.folders
    }

    /// Routing rules.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Sent mail, oldest first.
    #[must_use]
    pub fn sent(&self) -> &[Mail] {
        &self.sent
    }
}
