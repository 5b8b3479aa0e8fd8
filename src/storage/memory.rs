//! In-memory storage backend for testing.
//!
//! Provides [`InMemoryStorage`], a thread-safe in-memory implementation of
//! [`super::Storage`]. It also counts saves, so tests can check that a
//! session wrote nothing.

use core::future::{self, Future};
use std::sync::Mutex;

use crate::error::{EditorError, Result};
use crate::models::{Offer, Payout};

/// Thread-safe in-memory storage for testing.
///
/// # Example
///
/// ```rust
/// use offer_editor::storage::InMemoryStorage;
///
/// let storage = InMemoryStorage::new();
/// assert_eq!(storage.save_count().unwrap(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    /// All state behind a single mutex for thread-safe interior mutability.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// Stored offers.
    offers: Vec<Offer>,
    /// Stored payouts.
    payouts: Vec<Payout>,
    /// Number of successful save calls, across both documents.
    saves: usize,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-filled with the given documents.
    #[inline]
    #[must_use]
    pub fn with_records(offers: Vec<Offer>, payouts: Vec<Payout>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                offers,
                payouts,
                saves: 0,
            }),
        }
    }

    /// Returns a copy of the stored offers.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Storage`] if the lock is poisoned.
    #[inline]
    pub fn offers(&self) -> Result<Vec<Offer>> {
        self.with_lock(|inner| inner.offers.clone())
    }

    /// Returns a copy of the stored payouts.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Storage`] if the lock is poisoned.
    #[inline]
    pub fn payouts(&self) -> Result<Vec<Payout>> {
        self.with_lock(|inner| inner.payouts.clone())
    }

    /// Returns how many times either document has been saved.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Storage`] if the lock is poisoned.
    #[inline]
    pub fn save_count(&self) -> Result<usize> {
        self.with_lock(|inner| inner.saves)
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R, F: FnOnce(&mut Inner) -> R>(&self, op: F) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(op(&mut inner))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> EditorError {
    EditorError::Storage(err.to_string().into())
}

impl super::Storage for InMemoryStorage {
    #[inline]
    fn load_offers(&self) -> impl Future<Output = Result<Vec<Offer>>> + Send {
        future::ready(self.offers())
    }

    #[inline]
    fn load_payouts(&self) -> impl Future<Output = Result<Vec<Payout>>> + Send {
        future::ready(self.payouts())
    }

    #[inline]
    fn save_offers(&self, offers: &[Offer]) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| {
            inner.offers = offers.to_vec();
            inner.saves += 1;
        }))
    }

    #[inline]
    fn save_payouts(&self, payouts: &[Payout]) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| {
            inner.payouts = payouts.to_vec();
            inner.saves += 1;
        }))
    }
}
