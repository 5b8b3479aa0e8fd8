//! Interactive editor for an offer catalog and its payout schedule.
//!
//! The catalog (`offers.json`) and the schedule (`offerPayouts.json`) are
//! flat JSON arrays. An update session asks the operator for an offer ID,
//! prompts field by field for the offer and its payout, and writes both
//! documents back.

pub mod config;
pub mod error;
pub mod models;
pub mod payout_form;
pub mod prompt;
pub mod storage;
pub mod update;
