//! Shared test utilities for the MIR dataset workspace.
//!
//! This crate provides standardised dataset fixtures so crate test suites
//! do not each hand-roll index JSON and on-disk trees. It is a
//! dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`dataset`]: [`TestDataset`] builder for an index plus a data home

pub mod dataset;

pub use dataset::{TestDataset, TestDatasetBuilder, md5_hex};
