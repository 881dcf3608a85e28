//! Dataset definitions stored as TOML next to their index
//!
//! ```text
//! definitions/
//!   medleydb_melody.toml      # name, directory, index = "..."
//! indexes/
//!   medleydb_melody_index.json
//! ```
//!
//! The `index` field is resolved relative to the definition file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::registry::RegisteredDataset;
use crate::{DatasetDescriptor, DatasetIndex, Error, Result};

/// A dataset definition as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetDefinition {
    /// Human-readable dataset name
    pub name: String,
    /// Directory under the data home
    pub directory: String,
    /// Optional explicit module key; must match the derived one
    #[serde(default)]
    pub module: Option<String>,
    /// Index file path, relative to the definition
    pub index: PathBuf,
    #[serde(default)]
    pub citation: Option<String>,
    /// Manual download instructions, `{data_home}` is substituted
    #[serde(default)]
    pub download: Option<String>,
}

impl DatasetDefinition {
    /// Parse a definition from TOML text.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::DefinitionParse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate the naming rules and pair the descriptor with its index.
    ///
    /// # Errors
    ///
    /// Returns the descriptor validation error when the name, directory or
    /// declared module key are inconsistent.
    pub fn into_dataset(self, index: DatasetIndex) -> Result<RegisteredDataset> {
        let mut descriptor = DatasetDescriptor::new(self.name, self.directory)?;
        if let Some(module) = &self.module {
            descriptor = descriptor.expect_module_key(module)?;
        }
        if let Some(citation) = self.citation {
            descriptor = descriptor.with_citation(citation);
        }
        if let Some(download) = self.download {
            descriptor = descriptor.with_download_instructions(download);
        }
        Ok(RegisteredDataset::new(descriptor, index))
    }
}

/// Loads dataset definitions from a directory of `*.toml` files.
#[derive(Debug, Default)]
pub struct DefinitionLoader;

impl DefinitionLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every definition in `dir`, in file name order.
    ///
    /// Definitions that cannot be read or parsed are logged and skipped so
    /// one broken file does not hide the rest. A definition that parses but
    /// violates the naming rules, or whose index is missing or malformed, is
    /// a configuration error and aborts the load.
    pub fn load_dir(&self, dir: &Path) -> Result<Vec<RegisteredDataset>> {
        let mut datasets = Vec::new();

        if !dir.is_dir() {
            return Ok(datasets);
        }

        let entries = fs::read_dir(dir).map_err(|e| Error::Fs(mir_fs::Error::io(dir, e)))?;
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            let definition = match fs::read_to_string(&path)
                .map_err(|e| Error::Fs(mir_fs::Error::io(&path, e)))
                .and_then(|content| DatasetDefinition::parse(&content, &path))
            {
                Ok(definition) => definition,
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", path, e);
                    continue;
                }
            };

            let index_path = path
                .parent()
                .unwrap_or(dir)
                .join(&definition.index);
            let index_content = fs::read_to_string(&index_path)
                .map_err(|e| Error::Fs(mir_fs::Error::io(&index_path, e)))?;
            let index = DatasetIndex::from_json_str(&index_content)?;

            let dataset = definition.into_dataset(index)?;
            tracing::debug!(
                module_key = dataset.descriptor().module_key(),
                definition = ?path,
                "Loaded dataset definition"
            );
            datasets.push(dataset);
        }

        Ok(datasets)
    }
}
