//! JSON-file-based storage backend.
//!
//! Each document is a single JSON array on disk, read and written whole.
//! Writes go to a sibling `.tmp` file first and are renamed over the
//! target.

use core::future::Future;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::debug;

use crate::config::Config;
use crate::error::{EditorError, Result};
use crate::models::{Offer, Payout};

/// Suffix appended to a document path for its temporary write target.
const TMP_SUFFIX: &str = ".tmp";

/// File-backed storage for the offer catalog and payout schedule.
///
/// # File layout
///
/// ```text
/// <data dir>/
///   offers.json
///   offerPayouts.json
/// ```
///
/// Both paths can also be set individually. No locking is performed; the
/// tool assumes a single operator session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    /// Path of the offer catalog.
    offers_path: PathBuf,
    /// Path of the payout schedule.
    payouts_path: PathBuf,
}

impl FileStorage {
    /// Creates a storage over two explicit document paths.
    #[inline]
    #[must_use]
    pub const fn new(offers_path: PathBuf, payouts_path: PathBuf) -> Self {
        Self {
            offers_path,
            payouts_path,
        }
    }

    /// Creates a storage over the paths resolved by `config`.
    #[inline]
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.offers_path(), config.payouts_path())
    }

    /// Returns the offer catalog path.
    #[inline]
    #[must_use]
    pub fn offers_path(&self) -> &Path {
        &self.offers_path
    }

    /// Returns the payout schedule path.
    #[inline]
    #[must_use]
    pub fn payouts_path(&self) -> &Path {
        &self.payouts_path
    }
}

/// Reads a whole file and parses it as JSON.
///
/// # Errors
///
/// Returns [`EditorError::NotFound`] if the file does not exist,
/// [`EditorError::Parse`] if its content does not parse into `T`, and
/// [`EditorError::Io`] for any other read failure.
#[inline]
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub async fn read_document<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Send,
{
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(EditorError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(io_error(path, err)),
    };
    debug!(bytes = contents.len(), "document read");
    serde_json::from_str(&contents).map_err(|source| EditorError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serializes `document` with 2-space indentation and replaces the file.
///
/// # Errors
///
/// Returns [`EditorError::Serialization`] if the document cannot be
/// serialized and [`EditorError::Io`] if the file cannot be written.
#[inline]
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub async fn write_document<T>(path: &Path, document: &T) -> Result<()>
where
    T: Serialize + Sync + ?Sized,
{
    let json = serde_json::to_string_pretty(document)?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|err| io_error(&tmp_path, err))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|err| io_error(path, err))?;
    debug!(bytes = json.len(), "document written");
    Ok(())
}

/// Returns `<path>.tmp`.
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Wraps an I/O error with the path it concerns.
fn io_error(path: &Path, source: io::Error) -> EditorError {
    EditorError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl super::Storage for FileStorage {
    #[inline]
    fn load_offers(&self) -> impl Future<Output = Result<Vec<Offer>>> + Send {
        async move {
            let offers: Vec<Offer> = read_document(&self.offers_path).await?;
            debug!(count = offers.len(), "offers loaded");
            Ok(offers)
        }
    }

    #[inline]
    fn load_payouts(&self) -> impl Future<Output = Result<Vec<Payout>>> + Send {
        async move {
            let payouts: Vec<Payout> = read_document(&self.payouts_path).await?;
            debug!(count = payouts.len(), "payouts loaded");
            Ok(payouts)
        }
    }

    #[inline]
    fn save_offers(&self, offers: &[Offer]) -> impl Future<Output = Result<()>> + Send {
        write_document(&self.offers_path, offers)
    }

    #[inline]
    fn save_payouts(&self, payouts: &[Payout]) -> impl Future<Output = Result<()>> + Send {
        write_document(&self.payouts_path, payouts)
    }
}
