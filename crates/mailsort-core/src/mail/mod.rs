//! Mail messages.

mod model;

pub use model::Mail;
