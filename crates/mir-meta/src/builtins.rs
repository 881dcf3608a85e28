//! Datasets bundled with the crate
//!
//! Definitions and indexes are compiled in from `definitions/` and
//! `indexes/` so the registry needs no files at runtime.

use std::path::Path;

use crate::{DatasetDefinition, DatasetIndex, RegisteredDataset, Result};

struct Bundled {
    definition_path: &'static str,
    definition: &'static str,
    index: &'static str,
}

const BUNDLED: &[Bundled] = &[
    Bundled {
        definition_path: "definitions/beatles.toml",
        definition: include_str!("../definitions/beatles.toml"),
        index: include_str!("../indexes/beatles_index.json"),
    },
    Bundled {
        definition_path: "definitions/medleydb_melody.toml",
        definition: include_str!("../definitions/medleydb_melody.toml"),
        index: include_str!("../indexes/medleydb_melody_index.json"),
    },
];

/// Parse and validate every bundled dataset.
pub fn datasets() -> Result<Vec<RegisteredDataset>> {
    BUNDLED
        .iter()
        .map(|bundled| {
            let definition =
                DatasetDefinition::parse(bundled.definition, Path::new(bundled.definition_path))?;
            let index = DatasetIndex::from_json_str(bundled.index)?;
            definition.into_dataset(index)
        })
        .collect()
}
