//! Dataset descriptors and naming rules
//!
//! Every dataset has a human-readable name, an on-disk directory name and a
//! module key used to look it up in the registry. The module key is never
//! stored independently: it is derived from the directory name, so the two
//! cannot drift apart.

use regex::Regex;
use std::sync::LazyLock;

use crate::{Error, Result};

/// Letters, digits, `_`, `-` and spaces; starts with a letter, ends alphanumeric.
static DATASET_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_\- ]+[A-Za-z0-9]$").unwrap());

static MODULE_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Derive the registry module key from a dataset directory name.
///
/// Lowercases and replaces hyphens with underscores; `RWC-Classical`
/// becomes `rwc_classical`.
pub fn derive_module_key(directory_name: &str) -> String {
    directory_name.to_lowercase().replace('-', "_")
}

/// Identity of a registered dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    name: String,
    directory_name: String,
    module_key: String,
    citation: Option<String>,
    download_instructions: Option<String>,
}

impl DatasetDescriptor {
    /// Create a descriptor, validating the name and directory rules.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDatasetName`] if `name` does not match the name pattern
    /// - [`Error::InvalidDirectoryName`] if `directory_name` contains spaces or
    ///   separators, or derives a malformed module key
    pub fn new(name: impl Into<String>, directory_name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let directory_name = directory_name.into();

        validate_name(&name)?;
        let module_key = validate_directory(&directory_name)?;

        Ok(Self {
            name,
            directory_name,
            module_key,
            citation: None,
            download_instructions: None,
        })
    }

    /// Check that an explicitly declared module key agrees with the derived one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModuleKeyMismatch`] when they differ.
    pub fn expect_module_key(self, declared: &str) -> Result<Self> {
        if declared != self.module_key {
            return Err(Error::ModuleKeyMismatch {
                directory: self.directory_name,
                declared: declared.to_string(),
                derived: self.module_key,
            });
        }
        Ok(self)
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }

    pub fn with_download_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.download_instructions = Some(instructions.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory under the data home holding this dataset.
    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }

    pub fn module_key(&self) -> &str {
        &self.module_key
    }

    pub fn citation(&self) -> Option<&str> {
        self.citation.as_deref()
    }

    /// Manual download instructions; `{data_home}` marks where the data goes.
    pub fn download_instructions(&self) -> Option<&str> {
        self.download_instructions.as_deref()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if !DATASET_NAME_PATTERN.is_match(name) {
        return Err(Error::InvalidDatasetName {
            name: name.to_string(),
            reason: "must start with a letter, end with a letter or digit, \
                     contain only letters, digits, '_', '-' or spaces, \
                     and be at least three characters long"
                .to_string(),
        });
    }
    Ok(())
}

fn validate_directory(directory: &str) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidDirectoryName {
        directory: directory.to_string(),
        reason: reason.to_string(),
    };

    if directory.is_empty() {
        return Err(invalid("directory name is empty"));
    }
    if directory.contains(char::is_whitespace) {
        return Err(invalid("directory name must not contain spaces"));
    }
    if directory.contains(['/', '\\']) {
        return Err(invalid("directory name must be a single path component"));
    }

    let module_key = derive_module_key(directory);
    if module_key.contains("__") {
        return Err(invalid("derived module key contains adjacent underscores"));
    }
    if !MODULE_KEY_PATTERN.is_match(&module_key) {
        return Err(invalid(
            "derived module key must start with a letter and contain only letters, digits and '_'",
        ));
    }
    Ok(module_key)
}
