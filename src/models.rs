//! Data models for the offer catalog and payout schedule.
//!
//! Records mirror the JSON documents on disk. Fields this tool does not
//! manage are carried through untouched, and records keep their key order.

mod amount;
mod ids;
mod offer;
mod payout;
mod record;

pub use amount::Amount;
pub use ids::OfferId;
pub use offer::{Offer, OfferEdit, parse_categories};
pub use payout::{CountryOverrides, Payout, PayoutTerms, PayoutType};
pub use record::KeyOrder;
