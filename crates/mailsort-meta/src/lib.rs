//! # mailsort-meta
//!
//! Scanner for the line-oriented metadata block that accompanies every mail
//! handed to `mailsort`.
//!
//! ## Format
//!
//! ```text
//! sender: testy@gmail.com
//! subject: Hello, MJT!
//! recipients: pesho@gmail.com, gosho@gmail.com,
//! received: 2022-12-08 14:14
//! ```
//!
//! Keys are case-insensitive and may appear in any order. Unknown keys are
//! kept in [`Fields`] but ignored by [`Metadata`].
//!
//! ## Quick Start
//!
//! ```
//! use mailsort_meta::Metadata;
//!
//! let meta = Metadata::parse("sender: a@b.com\nsubject: Hi\nrecipients: c@d.com, e@f.com")?;
//! assert_eq!(meta.sender.as_deref(), Some("a@b.com"));
//! assert_eq!(meta.recipients.len(), 2);
//! # Ok::<(), mailsort_meta::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod fields;
mod metadata;

pub use error::{Error, Result};
pub use fields::Fields;
pub use metadata::{Metadata, RECEIVED_FORMAT};
