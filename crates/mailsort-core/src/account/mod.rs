//! Account identity and validation.

mod model;
mod validation;

pub use model::Account;
pub use validation::{ValidationError, ValidationResult, validate_account};
