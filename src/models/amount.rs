//! Monetary amount used by payouts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EditorError;

/// Largest magnitude at which every integer is exactly representable as
/// an `f64` (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A payout amount.
///
/// Whole values serialize as JSON integers (`5`, not `5.0`) so untouched
/// records keep their textual form. Non-finite values serialize as `null`,
/// and a `null` read in a position that requires an amount becomes `NaN`,
/// so legacy documents survive a load/save cycle unchanged.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(f64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0.0_f64);

    /// Creates an amount from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns `true` if the amount is neither `NaN` nor infinite.
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Parses operator input as an amount.
    ///
    /// Surrounding whitespace is ignored. Empty, non-numeric and
    /// non-finite input (`NaN`, `inf`) is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidAmount`] carrying the original input.
    #[inline]
    pub fn parse(input: &str) -> Result<Self, EditorError> {
        input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Self)
            .ok_or_else(|| EditorError::InvalidAmount {
                input: input.to_owned(),
            })
    }

    /// Returns `Some` only when this amount is usable as a prompt default.
    #[inline]
    #[must_use]
    pub fn finite(self) -> Option<Self> {
        self.is_finite().then_some(self)
    }

    /// Returns the value as an exact integer if it has no fractional part.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "range and fraction are checked before the cast"
    )]
    fn as_exact_integer(self) -> Option<i64> {
        (self.0.is_finite() && self.0.fract() == 0.0_f64 && self.0.abs() <= MAX_EXACT_INTEGER)
            .then_some(self.0 as i64)
    }
}

impl core::fmt::Display for Amount {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(whole) = self.as_exact_integer() {
            serializer.serialize_i64(whole)
        } else if self.is_finite() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    #[inline]
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<f64>::deserialize(deserializer)?;
        Ok(Self(value.unwrap_or(f64::NAN)))
    }
}
