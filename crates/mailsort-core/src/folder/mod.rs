//! Per-account folder namespace.
//!
//! Folders are addressed by slash-delimited paths rooted at the default
//! folder, e.g. `/inbox/work/reports`. A folder can only be created once its
//! parent exists, and folders are never deleted.

mod path;
mod tree;

pub use path::{SEPARATOR, parent};
pub use tree::FolderTree;
