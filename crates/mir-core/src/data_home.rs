//! Data home selection and path resolution

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::{Result, Settings};

static GLOBAL_RESOLVER: OnceLock<PathResolver> = OnceLock::new();

/// Where datasets live on disk.
///
/// `Default` defers to the process-wide default root; `Custom` is used
/// exactly as given, even when it looks empty or relative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DataHome {
    #[default]
    Default,
    Custom(PathBuf),
}

impl DataHome {
    pub fn custom(path: impl Into<PathBuf>) -> Self {
        Self::Custom(path.into())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

impl From<PathBuf> for DataHome {
    fn from(path: PathBuf) -> Self {
        Self::Custom(path)
    }
}

impl From<&Path> for DataHome {
    fn from(path: &Path) -> Self {
        Self::Custom(path.to_path_buf())
    }
}

impl From<&str> for DataHome {
    fn from(path: &str) -> Self {
        Self::Custom(PathBuf::from(path))
    }
}

impl From<Option<PathBuf>> for DataHome {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Default, Self::Custom)
    }
}

/// Resolves data homes and dataset directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    default_root: PathBuf,
}

impl PathResolver {
    pub fn new(default_root: impl Into<PathBuf>) -> Self {
        Self {
            default_root: default_root.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.data_home.clone())
    }

    /// The process-wide resolver, built from [`Settings::load`] on first use.
    ///
    /// # Errors
    ///
    /// Returns the settings error if the user's config file is malformed.
    pub fn global() -> Result<&'static PathResolver> {
        if let Some(resolver) = GLOBAL_RESOLVER.get() {
            return Ok(resolver);
        }
        let settings = Settings::load()?;
        tracing::debug!(
            data_home = ?settings.data_home,
            source = ?settings.source,
            "Resolved default data home"
        );
        Ok(GLOBAL_RESOLVER.get_or_init(|| Self::from_settings(&settings)))
    }

    pub fn default_root(&self) -> &Path {
        &self.default_root
    }

    /// The root a data home stands for.
    pub fn data_root(&self, data_home: &DataHome) -> PathBuf {
        match data_home {
            DataHome::Default => self.default_root.clone(),
            DataHome::Custom(path) => path.clone(),
        }
    }

    /// `<data root>/<dataset_directory>`, with no normalization.
    pub fn resolve(&self, data_home: &DataHome, dataset_directory: &str) -> PathBuf {
        self.data_root(data_home).join(dataset_directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_joins_directory() {
        let resolver = PathResolver::new("/home/user/mir_datasets");
        assert_eq!(
            resolver.resolve(&DataHome::Default, "MedleyDB-Melody"),
            PathBuf::from("/home/user/mir_datasets/MedleyDB-Melody")
        );
    }

    #[rstest]
    #[case("casa/de/data")]
    #[case("")]
    #[case("./")]
    #[case("/abs/../data")]
    fn test_custom_root_used_verbatim(#[case] root: &str) {
        let resolver = PathResolver::new("/home/user/mir_datasets");
        let data_home = DataHome::from(root);

        assert_eq!(resolver.data_root(&data_home), PathBuf::from(root));
        assert_eq!(
            resolver.resolve(&data_home, "Beatles"),
            Path::new(root).join("Beatles")
        );
    }

    #[test]
    fn test_custom_and_default_differ_unless_identical() {
        let resolver = PathResolver::new("/home/user/mir_datasets");
        let default = resolver.resolve(&DataHome::Default, "Beatles");
        let custom = resolver.resolve(&DataHome::custom("casa/de/data"), "Beatles");
        let same = resolver.resolve(&DataHome::custom("/home/user/mir_datasets"), "Beatles");

        assert_ne!(default, custom);
        assert_eq!(default, same);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(DataHome::from(None), DataHome::Default);
        assert_eq!(
            DataHome::from(Some(PathBuf::from("x"))),
            DataHome::Custom(PathBuf::from("x"))
        );
    }
}
