//! Track access and dataset validation for MIR datasets
//!
//! A [`Dataset`] pairs a registered dataset with a [`PathResolver`]. From it,
//! callers construct [`Track`]s for individual recordings, load every track
//! at once, or validate an on-disk copy against the dataset index.
//!
//! ```ignore
//! use mir_core::{DataHome, dataset};
//!
//! let medley = dataset("medleydb_melody")?;
//! let report = medley.validate(&DataHome::Default, true)?;
//! let track = medley.track("MusicDelta_Beethoven", &DataHome::custom("/data/mir"))?;
//! ```

pub mod data_home;
pub mod dataset;
pub mod download;
pub mod error;
pub mod settings;
pub mod track;
pub mod validate;

pub use data_home::{DataHome, PathResolver};
pub use dataset::{Dataset, dataset};
pub use download::{Downloader, ManualDownloader};
pub use error::{Error, Result};
pub use settings::{DATA_HOME_ENV, Settings, SettingsResolver, SettingsSource};
pub use track::Track;
pub use validate::{FileRef, ValidationReport, ValidationStatus, Validator};
