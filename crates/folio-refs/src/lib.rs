//! Branches and tag names for Folio version stores.
//!
//! A branch is an explicit pointer from a name to the head version of that
//! line of history, held in a [`RefTable`] together with the name of the
//! current branch. The table is persisted inside the store index and updated
//! by every operation that moves head.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`names`] -- Branch/tag name validation
//! - [`table`] -- The [`RefTable`] pointer map

pub mod error;
pub mod names;
pub mod table;

pub use error::{RefError, RefResult};
pub use names::{validate_branch_name, validate_tag_name};
pub use table::RefTable;
