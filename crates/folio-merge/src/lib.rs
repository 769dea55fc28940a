//! Merge support for Folio branches.
//!
//! Merging is coarse: [`detect_conflicts`] compares block counts and titles,
//! and [`resolve`] picks one side's snapshot whole according to a
//! [`MergeStrategy`]. Independent edits on the other side are not
//! reconciled; there is no three-way content merge.

pub mod conflict;
pub mod strategy;

pub use conflict::{detect_conflicts, MergeConflict};
pub use strategy::{resolve, MergeStrategy};
