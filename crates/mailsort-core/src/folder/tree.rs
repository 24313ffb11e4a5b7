//! Folder tree storage.

use std::collections::BTreeMap;

use tracing::debug;

use super::path::{check_syntax, parent};
use crate::error::{Error, Result};
use crate::mail::Mail;

/// Mapping from folder path to the mail it holds, in arrival order.
#[derive(Debug, Clone)]
pub struct FolderTree {
    default_folder: String,
    folders: BTreeMap<String, Vec<Mail>>,
}

impl FolderTree {
    /// Create a tree holding only the (empty) default folder.
    #[must_use]
    pub fn new(default_folder: impl Into<String>) -> Self {
        let default_folder = default_folder.into();
        let mut folders = BTreeMap::new();
        folders.insert(default_folder.clone(), Vec::new());
        Self {
            default_folder,
            folders,
        }
    }

    /// Path of the default folder.
    #[must_use]
    pub fn default_folder(&self) -> &str {
        &self.default_folder
    }

    /// Whether `path` exists.
    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.folders.contains_key(path)
    }

    /// Create an empty folder at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::FolderAlreadyExists`] if `path` is already present.
    /// - [`Error::InvalidPath`] if `path` is not below the default folder,
    ///   contains an empty segment, or its parent does not exist yet.
    pub fn create_folder(&mut self, path: &str) -> Result<()> {
        if self.exists(path) {
            return Err(Error::FolderAlreadyExists(path.to_string()));
        }

        check_syntax(path, &self.default_folder)?;

        if !parent(path).is_some_and(|parent| self.exists(parent)) {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "there are missing intermediate folders",
            });
        }

        self.folders.insert(path.to_string(), Vec::new());
        debug!(path, "Folder created");
        Ok(())
    }

    /// Mail in `path`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if `path` does not exist.
    pub fn mails_in(&self, path: &str) -> Result<&[Mail]> {
        self.folders
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::FolderNotFound(path.to_string()))
    }

    /// Append `mail` to `path`.
    ///
    /// Folders are never created implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if `path` does not exist.
    pub fn place(&mut self, path: &str, mail: Mail) -> Result<()> {
        self.folder_mut(path)
            .ok_or_else(|| Error::FolderNotFound(path.to_string()))?
            .push(mail);
        Ok(())
    }

    /// Folder paths in sorted order.
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.folders.keys().map(String::as_str)
    }

    /// Total number of mails across all folders.
    #[must_use]
    pub fn mail_count(&self) -> usize {
        self.folders.values().map(Vec::len).sum()
    }

    pub(crate) fn folder_mut(&mut self, path: &str) -> Option<&mut Vec<Mail>> {
        self.folders.get_mut(path)
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

    fn mail(subject: &str) -> Mail {
        Mail::new(
            Account::new("Nikolay", "niki@abv.bg"),
            ["stoyo@gmail.com"],
            subject,
            "body",
            None,
        )
    }

    #[test]
    fn new_has_only_default() {
        let tree = FolderTree::new("/inbox");
        assert_eq!(tree.folders().collect::<Vec<_>>(), vec!["/inbox"]);
        assert!(tree.mails_in("/inbox").unwrap().is_empty());
    }

    #[test]
    fn create_folder_successfully() {
        let mut tree = FolderTree::new("/inbox");
        tree.create_folder("/inbox/important").unwrap();
        assert!(tree.exists("/inbox/important"));
    }

    #[test]
    fn create_folder_already_existed() {
        let mut tree = FolderTree::new("/inbox");
        tree.create_folder("/inbox/important").unwrap();
        assert!(matches!(
            tree.create_folder("/inbox/important"),
            Err(Error::FolderAlreadyExists(_))
        ));
        assert!(matches!(
            tree.create_folder("/inbox"),
            Err(Error::FolderAlreadyExists(_))
        ));
    }

    #[test]
    fn create_folder_without_root() {
        let mut tree = FolderTree::new("/inbox");
        assert!(matches!(
            tree.create_folder("/important/documents"),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn create_folder_missing_intermediate() {
        let mut tree = FolderTree::new("/inbox");
        assert!(matches!(
            tree.create_folder("/inbox/important/documents"),
            Err(Error::InvalidPath { .. })
        ));
        assert!(!tree.exists("/inbox/important/documents"));
    }

    #[test]
    fn mails_in_missing_folder() {
        let tree = FolderTree::new("/inbox");
        assert!(matches!(
            tree.mails_in("/inbox/news"),
            Err(Error::FolderNotFound(_))
        ));
    }

    #[test]
    fn place_keeps_arrival_order() {
        let mut tree = FolderTree::new("/inbox");
        tree.place("/inbox", mail("first")).unwrap();
        tree.place("/inbox", mail("second")).unwrap();

        let subjects: Vec<_> = tree
            .mails_in("/inbox")
            .unwrap()
            .iter()
            .map(|m| m.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["first", "second"]);
        assert_eq!(tree.mail_count(), 2);
    }

    #[test]
    fn place_into_missing_folder_fails() {
        let mut tree = FolderTree::new("/inbox");
        assert!(matches!(
            tree.place("/inbox/nowhere", mail("lost")),
            Err(Error::FolderNotFound(_))
        ));
        assert!(!tree.exists("/inbox/nowhere"));
    }

    proptest! {
        #[test]
        fn created_paths_exist_and_cannot_be_recreated(
            segments in prop::collection::vec("[a-z]{1,6}", 1..5)
        ) {
            let mut tree = FolderTree::new("/inbox");
            let mut path = String::from("/inbox");
            for segment in &segments {
                path.push('/');
                path.push_str(segment);
                tree.create_folder(&path).unwrap();
                prop_assert!(tree.exists(&path));
            }
            prop_assert!(
                matches!(tree.create_folder(&path), Err(Error::FolderAlreadyExists(_))),
                "second create of {} must fail",
                path
            );
        }
    }
}
