//! Payout schedule record and payout types.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::record::{KeyOrder, deserialize_ordered, serialize_ordered};
use super::{Amount, OfferId};

/// Per-country CPA amounts, keyed by country code in entry order.
pub type CountryOverrides = IndexMap<String, Amount>;

/// How an offer pays out.
///
/// The three known variants serialize as `"CPA"`, `"FIXED"` and
/// `"CPA_AND_FIXED"`. Any other text is kept verbatim in [`Other`]
/// rather than rejected; matching is exact and case-sensitive.
///
/// [`Other`]: PayoutType::Other
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PayoutType {
    /// Cost per action.
    Cpa,
    /// Flat amount.
    Fixed,
    /// Both a CPA and a flat amount.
    CpaAndFixed,
    /// Unrecognized type text.
    Other(String),
}

impl PayoutType {
    /// Wire name of [`PayoutType::Cpa`].
    pub const CPA: &'static str = "CPA";
    /// Wire name of [`PayoutType::Fixed`].
    pub const FIXED: &'static str = "FIXED";
    /// Wire name of [`PayoutType::CpaAndFixed`].
    pub const CPA_AND_FIXED: &'static str = "CPA_AND_FIXED";

    /// Returns the wire representation.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match *self {
            Self::Cpa => Self::CPA,
            Self::Fixed => Self::FIXED,
            Self::CpaAndFixed => Self::CPA_AND_FIXED,
            Self::Other(ref text) => text,
        }
    }

    /// Returns `true` if this type carries a CPA amount.
    #[inline]
    #[must_use]
    pub const fn includes_cpa(&self) -> bool {
        matches!(*self, Self::Cpa | Self::CpaAndFixed)
    }

    /// Returns `true` if this type carries a fixed amount.
    #[inline]
    #[must_use]
    pub const fn includes_fixed(&self) -> bool {
        matches!(*self, Self::Fixed | Self::CpaAndFixed)
    }
}

impl From<String> for PayoutType {
    #[inline]
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::CPA => Self::Cpa,
            Self::FIXED => Self::Fixed,
            Self::CPA_AND_FIXED => Self::CpaAndFixed,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for PayoutType {
    #[inline]
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl core::fmt::Display for PayoutType {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PayoutType {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PayoutType {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// The editable part of a payout: everything except `offerId`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutTerms {
    /// Payout type; absent on partially filled legacy records.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PayoutType>,
    /// Base CPA amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpa_amount: Option<Amount>,
    /// Per-country CPA amounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpa_country_overrides: Option<CountryOverrides>,
    /// Flat amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_amount: Option<Amount>,
}

impl PayoutTerms {
    /// Returns `true` if every amount required by the type is present.
    ///
    /// Terms without a type, or with an unrecognized one, require nothing.
    #[inline]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.kind.as_ref().is_none_or(|kind| {
            (!kind.includes_cpa() || self.cpa_amount.is_some())
                && (!kind.includes_fixed() || self.fixed_amount.is_some())
        })
    }
}

/// An entry of the payout schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Payout {
    /// Offer this payout belongs to.
    pub offer_id: OfferId,
    /// Type and amounts.
    pub terms: PayoutTerms,
    /// Fields this tool does not manage.
    pub extra: Map<String, Value>,
    /// Key order of the record as read.
    pub key_order: KeyOrder,
}

impl Payout {
    /// Creates a payout with no extra fields.
    #[inline]
    #[must_use]
    pub fn new(offer_id: OfferId, terms: PayoutTerms) -> Self {
        Self {
            offer_id,
            terms,
            extra: Map::new(),
            key_order: KeyOrder::default(),
        }
    }
}

/// Wire form of a [`Payout`] being read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayoutFields {
    /// See [`Payout::offer_id`].
    offer_id: OfferId,
    /// See [`Payout::terms`].
    #[serde(flatten)]
    terms: PayoutTerms,
    /// See [`Payout::extra`].
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Wire form of a [`Payout`] being written.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayoutFieldsRef<'payout> {
    /// See [`Payout::offer_id`].
    offer_id: &'payout OfferId,
    /// See [`Payout::terms`].
    #[serde(flatten)]
    terms: &'payout PayoutTerms,
    /// See [`Payout::extra`].
    #[serde(flatten)]
    extra: &'payout Map<String, Value>,
}

impl Serialize for Payout {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = PayoutFieldsRef {
            offer_id: &self.offer_id,
            terms: &self.terms,
            extra: &self.extra,
        };
        serialize_ordered(&fields, &self.key_order, serializer)
    }
}

impl<'de> Deserialize<'de> for Payout {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (fields, key_order): (PayoutFields, _) = deserialize_ordered(deserializer)?;
        Ok(Self {
            offer_id: fields.offer_id,
            terms: fields.terms,
            extra: fields.extra,
            key_order,
        })
    }
}
