//! Dataset metadata for MIR datasets.
//!
//! This crate provides dataset descriptors with their naming rules, the
//! per-dataset file index, on-disk dataset definitions, and the
//! process-wide registry of known datasets.

pub mod builtins;
pub mod definition;
pub mod descriptor;
pub mod error;
pub mod index;
pub mod registry;

pub use definition::{DatasetDefinition, DefinitionLoader};
pub use descriptor::{DatasetDescriptor, derive_module_key};
pub use error::{Error, Result};
pub use index::{DatasetIndex, FileEntry, TrackIndexEntry};
pub use registry::{DatasetRegistry, RegisteredDataset, builtin_registry};
