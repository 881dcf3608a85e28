//! Dataset validation
//!
//! The [`Validator`] walks a dataset index and the dataset directory and
//! produces a [`ValidationReport`] of missing, corrupted and unindexed files.

mod report;
mod validator;

pub use report::{FileRef, ValidationReport, ValidationStatus};
pub use validator::Validator;
