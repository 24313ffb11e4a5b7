//! # mailsort-core
//!
//! Rule-based mail routing for in-memory mail accounts.
//!
//! This crate provides:
//! - **Folder Tree** - per-account folder namespace rooted at the default folder
//! - **Rules** - a small definition language compiled into match criteria
//! - **Rule Sets** - priority-ordered rules with conflict detection
//! - **Routing** - first-match folder selection and inbox reclassification
//! - **Mail Store** - accounts, folders, rules and sent logs wired together
//!
//! # Example
//!
//! ```
//! use mailsort_core::MailStore;
//!
//! let mut store = MailStore::new();
//! store.add_account("Nikolay", "niki@abv.bg")?;
//! store.create_folder("Nikolay", "/inbox/documents")?;
//! let outcome = store.add_rule(
//!     "Nikolay",
//!     "/inbox/documents",
//!     "subject-includes: MJT\nsubject-or-body-includes: best, course",
//!     2,
//! )?;
//! assert!(outcome.is_added());
//!
//! let folder = store.receive_mail(
//!     "Nikolay",
//!     "sender: gosho@abv.bg\nsubject: Hello, MJT!\nrecipients: niki@abv.bg",
//!     "MJT course is the best course in FMI!",
//! )?;
//! assert_eq!(folder, "/inbox/documents");
//! # Ok::<(), mailsort_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod config;
mod error;
pub mod folder;
pub mod mail;
pub mod routing;
pub mod rule;
pub mod store;

pub use account::{Account, ValidationError, ValidationResult, validate_account};
pub use config::Settings;
pub use error::{Error, Result};
pub use folder::FolderTree;
pub use mail::Mail;
pub use routing::{best_folder_for, reclassify};
pub use rule::{Criteria, Keyword, ParseMode, Priority, Rule, RuleOutcome, RuleSet, parse_definition};
pub use store::{MailStore, Mailbox};
