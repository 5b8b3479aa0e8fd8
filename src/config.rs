//! Resolution of the data file locations.
//!
//! By default both documents live in `./data`. The directory, and each
//! file individually, can be overridden through environment variables;
//! the binary additionally accepts `--data-dir`.

use std::path::{Path, PathBuf};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "OFFER_EDITOR_DATA_DIR";
/// Environment variable naming the offer catalog file.
pub const OFFERS_FILE_ENV: &str = "OFFER_EDITOR_OFFERS_FILE";
/// Environment variable naming the payout schedule file.
pub const PAYOUTS_FILE_ENV: &str = "OFFER_EDITOR_PAYOUTS_FILE";

/// Data directory used when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "./data";
/// File name of the offer catalog inside the data directory.
pub const OFFERS_FILE: &str = "offers.json";
/// File name of the payout schedule inside the data directory.
pub const PAYOUTS_FILE: &str = "offerPayouts.json";

/// Where the offer catalog and payout schedule are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding both documents.
    data_dir: PathBuf,
    /// Explicit catalog path, overriding `data_dir`.
    offers_file: Option<PathBuf>,
    /// Explicit schedule path, overriding `data_dir`.
    payouts_file: Option<PathBuf>,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self::new(PathBuf::from(DEFAULT_DATA_DIR))
    }
}

impl Config {
    /// Creates a configuration rooted at `data_dir`.
    #[inline]
    #[must_use]
    pub const fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            offers_file: None,
            payouts_file: None,
        }
    }

    /// Resolves the configuration from the process environment.
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through `lookup`, which maps an
    /// environment variable name to its value. Empty values are ignored.
    #[inline]
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let data_dir = non_empty(DATA_DIR_ENV).map_or_else(
            || PathBuf::from(DEFAULT_DATA_DIR),
            PathBuf::from,
        );
        Self {
            data_dir,
            offers_file: non_empty(OFFERS_FILE_ENV).map(PathBuf::from),
            payouts_file: non_empty(PAYOUTS_FILE_ENV).map(PathBuf::from),
        }
    }

    /// Replaces the data directory. Explicit file paths still win.
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    /// Returns the data directory.
    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the resolved offer catalog path.
    #[inline]
    #[must_use]
    pub fn offers_path(&self) -> PathBuf {
        self.offers_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(OFFERS_FILE))
    }

    /// Returns the resolved payout schedule path.
    #[inline]
    #[must_use]
    pub fn payouts_path(&self) -> PathBuf {
        self.payouts_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(PAYOUTS_FILE))
    }
}
