//! Filesystem primitives for MIR dataset validation
//!
//! Provides streaming checksums, forward-slash relative paths and
//! directory enumeration shared by the index and validator crates.

pub mod checksum;
pub mod error;
pub mod path;
pub mod walk;

pub use checksum::{Algorithm, ExpectedChecksum, compute_file_checksum, compute_file_checksum_with};
pub use error::{Error, Result};
pub use path::{NormalizedPath, validate_relative_path};
pub use walk::list_relative_files;
