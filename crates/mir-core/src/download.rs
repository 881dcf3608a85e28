//! Download seam
//!
//! Fetching dataset archives over the network lives outside this crate.
//! Implementations plug in through [`Downloader`], which receives the same
//! [`DataHome`] value as every other operation so that the default root is
//! resolved identically everywhere.

use std::fs;
use std::io::{self, Write};

use crate::{DataHome, Dataset, Error, Result};

/// Brings a dataset's files into its data home.
pub trait Downloader {
    fn download(&self, dataset: &Dataset<'_>, data_home: &DataHome) -> Result<()>;
}

/// Prints manual download instructions for datasets that cannot be fetched
/// automatically.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManualDownloader;

impl ManualDownloader {
    pub fn new() -> Self {
        Self
    }

    /// Render the dataset's instructions with its resolved directory
    /// substituted for `{data_home}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DownloadUnavailable`] if the dataset has no
    /// instructions.
    pub fn instructions(&self, dataset: &Dataset<'_>, data_home: &DataHome) -> Result<String> {
        let template = dataset.descriptor().download_instructions().ok_or_else(|| {
            Error::DownloadUnavailable {
                dataset: dataset.name().to_string(),
            }
        })?;
        let target = dataset.dataset_home(data_home);
        Ok(template.replace("{data_home}", &target.to_string_lossy()))
    }

    /// Create the dataset directory and write the instructions to `out`.
    pub fn download_to(
        &self,
        dataset: &Dataset<'_>,
        data_home: &DataHome,
        out: &mut impl Write,
    ) -> Result<()> {
        let message = self.instructions(dataset, data_home)?;
        let target = dataset.dataset_home(data_home);
        fs::create_dir_all(&target).map_err(|e| mir_fs::Error::io(&target, e))?;
        tracing::info!(dataset = dataset.name(), ?target, "Manual download required");
        out.write_all(message.as_bytes())?;
        Ok(())
    }
}

impl Downloader for ManualDownloader {
    fn download(&self, dataset: &Dataset<'_>, data_home: &DataHome) -> Result<()> {
        self.download_to(dataset, data_home, &mut io::stdout().lock())
    }
}
