//! Streaming file checksums
//!
//! Dataset indexes record one digest per file. Bare 32-character hex strings
//! are MD5 (the format every published MIR index uses); prefixed strings
//! (`md5:<hex>`, `sha256:<hex>`) name their algorithm explicitly.

use md5::Md5;
use sha2::digest::Output;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::{Error, Result};

/// Read buffer size for streaming digests.
const CHUNK_SIZE: usize = 64 * 1024;

const SHA256_PREFIX: &str = "sha256:";
const MD5_PREFIX: &str = "md5:";

/// Digest algorithm used for a checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    #[default]
    Md5,
    Sha256,
}

impl Algorithm {
    fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 => 64,
        }
    }

    /// Canonical rendering of a hex digest for this algorithm.
    ///
    /// MD5 stays bare so that computed values compare textually with index
    /// entries; SHA-256 carries its prefix.
    pub fn render(self, hex: &str) -> String {
        match self {
            Self::Md5 => hex.to_string(),
            Self::Sha256 => format!("{SHA256_PREFIX}{hex}"),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => f.write_str("md5"),
            Self::Sha256 => f.write_str("sha256"),
        }
    }
}

/// Compute the MD5 checksum of a file as lowercase hex.
///
/// The file is read in fixed-size chunks, so its size is not bounded by
/// available memory.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    compute_file_checksum_with(path, Algorithm::Md5)
}

/// Compute a file checksum with the given algorithm, rendered canonically.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub fn compute_file_checksum_with(path: &Path, algorithm: Algorithm) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let hex = match algorithm {
        Algorithm::Md5 => digest_reader::<Md5>(reader).map(|digest| format!("{digest:x}")),
        Algorithm::Sha256 => digest_reader::<Sha256>(reader).map(|digest| format!("{digest:x}")),
    }
    .map_err(|e| Error::io(path, e))?;
    Ok(algorithm.render(&hex))
}

fn digest_reader<D: Digest>(mut reader: impl Read) -> std::io::Result<Output<D>> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// A checksum recorded in a dataset index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExpectedChecksum {
    algorithm: Algorithm,
    /// Lowercase hex digest without prefix.
    hex: String,
}

impl ExpectedChecksum {
    /// Parse an index checksum string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChecksum`] when the value is not a hex digest of
    /// the expected length for its algorithm.
    pub fn parse(value: &str) -> Result<Self> {
        let (algorithm, hex) = if let Some(rest) = value.strip_prefix(SHA256_PREFIX) {
            (Algorithm::Sha256, rest)
        } else if let Some(rest) = value.strip_prefix(MD5_PREFIX) {
            (Algorithm::Md5, rest)
        } else {
            (Algorithm::Md5, value)
        };

        if hex.len() != algorithm.hex_len() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidChecksum {
                value: value.to_string(),
                reason: format!("expected {} hex characters for {algorithm}", algorithm.hex_len()),
            });
        }

        Ok(Self {
            algorithm,
            hex: hex.to_ascii_lowercase(),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Lowercase hex digest without algorithm prefix.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Digest the file at `path` and compare against this checksum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn matches_file(&self, path: &Path) -> Result<bool> {
        let actual = compute_file_checksum_with(path, self.algorithm)?;
        Ok(actual == self.to_string())
    }
}

impl fmt::Display for ExpectedChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.algorithm.render(&self.hex))
    }
}

impl std::str::FromStr for ExpectedChecksum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // md5("hello world")
    const HELLO_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn write_temp(content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.bin");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn md5_known_value() {
        let (_dir, path) = write_temp(b"hello world");
        assert_eq!(compute_file_checksum(&path).unwrap(), HELLO_MD5);
    }

    #[test]
    fn sha256_has_prefix() {
        let (_dir, path) = write_temp(b"hello world");
        let checksum = compute_file_checksum_with(&path, Algorithm::Sha256).unwrap();
        assert_eq!(checksum, format!("sha256:{HELLO_SHA256}"));
    }

    #[test]
    fn identical_content_same_digest_across_paths() {
        let (_a, first) = write_temp(b"same bytes");
        let (_b, second) = write_temp(b"same bytes");
        assert_eq!(
            compute_file_checksum(&first).unwrap(),
            compute_file_checksum(&second).unwrap()
        );
    }

    #[test]
    fn content_larger_than_chunk() {
        let content = vec![7u8; CHUNK_SIZE * 3 + 17];
        let (_dir, path) = write_temp(&content);
        let streamed = compute_file_checksum(&path).unwrap();

        assert_eq!(streamed, format!("{:x}", Md5::digest(&content)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = compute_file_checksum(&dir.path().join("absent.wav")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn parse_bare_hex_is_md5() {
        let expected = ExpectedChecksum::parse(HELLO_MD5).unwrap();
        assert_eq!(expected.algorithm(), Algorithm::Md5);
        assert_eq!(expected.to_string(), HELLO_MD5);
    }

    #[test]
    fn parse_uppercase_is_normalized() {
        let expected = ExpectedChecksum::parse(&HELLO_MD5.to_uppercase()).unwrap();
        assert_eq!(expected.hex(), HELLO_MD5);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(ExpectedChecksum::parse("abc123").is_err());
        assert!(ExpectedChecksum::parse("sha256:5eb63bbbe01eeed093cb22bb8f5acdc3").is_err());
    }

    #[test]
    fn matches_file_detects_mismatch() {
        let (_dir, path) = write_temp(b"hello world");
        let good = ExpectedChecksum::parse(&format!("sha256:{HELLO_SHA256}")).unwrap();
        let bad = ExpectedChecksum::parse("00000000000000000000000000000000").unwrap();
        assert!(good.matches_file(&path).unwrap());
        assert!(!bad.matches_file(&path).unwrap());
    }
}
