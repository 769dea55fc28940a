//! Branch and tag name validation following git-style conventions.
//!
//! Valid names:
//! - Must be non-empty
//! - Must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - Must not contain `..` (double dot) or `@{`
//! - Must not start or end with `.` or `/`
//! - Must not end with `.lock`
//! - Components between slashes must be non-empty and not start with `.`

use crate::error::{RefError, RefResult};

/// Characters that are forbidden anywhere in a name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Why `name` is not a valid ref name, or `None` if it is.
fn rejection(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("name must not be empty".into());
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Some(format!("contains forbidden character: {ch:?}"));
    }
    for (needle, reason) in [("..", "must not contain '..'"), ("@{", "must not contain '@{'")] {
        if name.contains(needle) {
            return Some(reason.into());
        }
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Some("must not start or end with '.'".into());
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Some("must not start or end with '/'".into());
    }
    if name.ends_with(".lock") {
        return Some("must not end with '.lock'".into());
    }
    for component in name.split('/') {
        if component.is_empty() {
            return Some("path components must not be empty".into());
        }
        if component.starts_with('.') {
            return Some(format!("component must not start with '.': {component:?}"));
        }
    }
    None
}

/// Validate a branch name.
///
/// # Examples
///
/// ```
/// use folio_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("drafts/legal-review").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("bad..name").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> RefResult<()> {
    match rejection(name) {
        None => Ok(()),
        Some(reason) => Err(RefError::InvalidBranchName {
            name: name.to_string(),
            reason,
        }),
    }
}

/// Validate a version tag. Same rules as branch names.
pub fn validate_tag_name(name: &str) -> RefResult<()> {
    match rejection(name) {
        None => Ok(()),
        Some(reason) => Err(RefError::InvalidTagName {
            name: name.to_string(),
            reason,
        }),
    }
}
