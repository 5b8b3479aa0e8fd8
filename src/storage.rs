//! Storage backends for the offer catalog and payout schedule.
//!
//! The [`Storage`] trait returns futures so callers can load or save both
//! documents concurrently. [`FileStorage`] persists to JSON files;
//! [`InMemoryStorage`] keeps everything in memory for tests.

mod file;
mod memory;

pub use file::{FileStorage, read_document, write_document};
pub use memory::InMemoryStorage;

use core::future::Future;

use crate::error::Result;
use crate::models::{Offer, Payout};

/// Backend holding the two documents edited by this tool.
///
/// Each document is read and written whole. Implementations use interior
/// mutability where needed, so all methods take `&self`.
pub trait Storage: core::fmt::Debug + Send + Sync {
    /// Loads the full offer catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog is missing, unreadable or malformed.
    fn load_offers(&self) -> impl Future<Output = Result<Vec<Offer>>> + Send;

    /// Loads the full payout schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule is missing, unreadable or malformed.
    fn load_payouts(&self) -> impl Future<Output = Result<Vec<Payout>>> + Send;

    /// Replaces the stored offer catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be serialized or written.
    fn save_offers(&self, offers: &[Offer]) -> impl Future<Output = Result<()>> + Send;

    /// Replaces the stored payout schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule cannot be serialized or written.
    fn save_payouts(&self, payouts: &[Payout]) -> impl Future<Output = Result<()>> + Send;
}
