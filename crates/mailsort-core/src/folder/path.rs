//! Folder path helpers.

use crate::error::{Error, Result};

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Parent of `path`, or `None` for a root-level path.
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR)
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}

/// Checks that `path` sits strictly below `root` and has no empty segments.
pub(crate) fn check_syntax(path: &str, root: &str) -> Result<()> {
    let below_root = path
        .strip_prefix(root)
        .and_then(|rest| rest.strip_prefix(SEPARATOR));

    let Some(rest) = below_root else {
        return Err(Error::InvalidPath {
            path: path.to_string(),
            reason: "path does not start from the default folder",
        });
    };

    if rest.split(SEPARATOR).any(|segment| segment.trim().is_empty()) {
        return Err(Error::InvalidPath {
            path: path.to_string(),
            reason: "path contains an empty segment",
        });
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
mod tests {
    use super::*;

    #[test]
    fn parent_of_nested() {
        assert_eq!(parent("/inbox/a/b"), Some("/inbox/a"));
        assert_eq!(parent("/inbox/a"), Some("/inbox"));
    }

    #[test]
    fn parent_of_root() {
        assert_eq!(parent("/inbox"), None);
        assert_eq!(parent("inbox"), None);
    }

    #[test]
    fn syntax_accepts_nested() {
        assert!(check_syntax("/inbox/a", "/inbox").is_ok());
        assert!(check_syntax("/inbox/a/b c", "/inbox").is_ok());
    }

    #[test]
    fn syntax_rejects_other_root() {
        assert!(check_syntax("/other/x", "/inbox").is_err());
        assert!(check_syntax("/inboxes/x", "/inbox").is_err());
        assert!(check_syntax("inbox/x", "/inbox").is_err());
        assert!(check_syntax("/inbox", "/inbox").is_err());
    }

    #[test]
    fn syntax_rejects_empty_segments() {
        assert!(check_syntax("/inbox//x", "/inbox").is_err());
        assert!(check_syntax("/inbox/x/", "/inbox").is_err());
        assert!(check_syntax("/inbox/ ", "/inbox").is_err());
    }
}
