//! Dataset registry
//!
//! Maps module keys to their descriptor and index. The built-in registry is
//! constructed once per process and never mutated afterwards, so readers
//! need no locking.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::{DatasetDescriptor, DatasetIndex, DefinitionLoader, Error, Result, builtins};

static BUILTIN_REGISTRY: LazyLock<DatasetRegistry> = LazyLock::new(|| {
    DatasetRegistry::with_builtins()
        .unwrap_or_else(|e| panic!("built-in dataset registration failed: {e}"))
});

/// The process-wide registry of built-in datasets.
///
/// Built-in definitions are validated on first access; a naming violation
/// aborts the process there rather than surfacing later as a lookup failure.
pub fn builtin_registry() -> &'static DatasetRegistry {
    &BUILTIN_REGISTRY
}

/// A dataset's descriptor together with its index.
#[derive(Debug, Clone)]
pub struct RegisteredDataset {
    descriptor: DatasetDescriptor,
    index: DatasetIndex,
}

impl RegisteredDataset {
    pub fn new(descriptor: DatasetDescriptor, index: DatasetIndex) -> Self {
        Self { descriptor, index }
    }

    pub fn descriptor(&self) -> &DatasetDescriptor {
        &self.descriptor
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }
}

/// Registry of datasets keyed by module key.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: BTreeMap<String, RegisteredDataset>,
}

impl DatasetRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the datasets bundled with this crate.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        for dataset in builtins::datasets()? {
            registry.register(dataset)?;
        }
        Ok(registry)
    }

    /// Register every definition found in `dir`.
    pub fn load_definitions(&mut self, dir: &Path) -> Result<usize> {
        let datasets = DefinitionLoader::new().load_dir(dir)?;
        let count = datasets.len();
        for dataset in datasets {
            self.register(dataset)?;
        }
        Ok(count)
    }

    /// Register a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateDataset`] if the module key is taken.
    pub fn register(&mut self, dataset: RegisteredDataset) -> Result<()> {
        let module_key = dataset.descriptor.module_key().to_string();
        if self.datasets.contains_key(&module_key) {
            return Err(Error::DuplicateDataset { module_key });
        }
        tracing::debug!(
            module_key = %module_key,
            tracks = dataset.index.len(),
            "Registered dataset"
        );
        self.datasets.insert(module_key, dataset);
        Ok(())
    }

    /// Look up a dataset by module key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetNotFound`] for unknown keys.
    pub fn get(&self, module_key: &str) -> Result<&RegisteredDataset> {
        self.datasets
            .get(module_key)
            .ok_or_else(|| Error::DatasetNotFound {
                module_key: module_key.to_string(),
            })
    }

    pub fn contains(&self, module_key: &str) -> bool {
        self.datasets.contains_key(module_key)
    }

    /// Registered module keys, sorted.
    pub fn module_keys(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    /// Registered datasets in module key order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredDataset> {
        self.datasets.values()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
