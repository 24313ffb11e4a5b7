//! Mail filtering rules.
//!
//! A [`Rule`] couples a compiled [`Criteria`] predicate with a destination
//! folder and a [`Priority`]. Rules are written in a small line-oriented
//! language:
//!
//! ```text
//! subject-includes: mjt, izpit, 2022
//! subject-or-body-includes: izpit
//! recipients-includes: pesho@gmail.com, gosho@gmail.com
//! from: stoyo@fmi.bg
//! ```
//!
//! Each keyword may appear at most once. A rule matches a mail only if at
//! least one of the subject, subject-or-body or recipients criteria is set
//! and satisfied; `from` narrows a match but never makes one on its own.

mod model;
mod parser;
mod set;

pub use model::{Criteria, Priority, Rule};
pub use parser::{Keyword, ParseMode, parse_definition};
pub use set::{RuleOutcome, RuleSet};
