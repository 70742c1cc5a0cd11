//! Shared primitive types used across the entire generator.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Account ids are dense and 1-based: account `n` lives at index `n - 1`.
pub type AccountId = u64;

/// Document ids are issued by the generation context's monotonic counter.
pub type DocumentId = u64;

/// All timestamps are naive (no zone), second precision.
pub type Timestamp = NaiveDateTime;

/// Wire format for every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter writing timestamps as `YYYY-MM-DD HH:MM:SS`.
pub mod timestamp_format {
    use super::{Timestamp, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Timestamp, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A non-negative monetary amount in minor units (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Negative inputs clamp to zero.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents.max(0))
    }

    /// Convert a major-unit value, rounding to the nearest cent.
    pub fn from_major(units: f64) -> Self {
        Self::from_cents((units * 100.0).round() as i64)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// True when there is no fractional part (e.g. 1200.00).
    pub fn is_whole(self) -> bool {
        self.0 % 100 == 0
    }

    /// Multiply by `factor`, rounding to the cent.
    pub fn scale(self, factor: f64) -> Self {
        Self::from_cents((self.0 as f64 * factor).round() as i64)
    }

    /// Round to the nearest whole unit, halves up.
    pub fn rounded_to_unit(self) -> Self {
        Self((self.0.saturating_add(50) / 100) * 100)
    }

    pub fn saturating_sub(self, other: Amount) -> Self {
        Self::from_cents(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.as_major())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let units = f64::deserialize(d)?;
        if !units.is_finite() || units < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "amount must be a non-negative number, got {units}"
            )));
        }
        Ok(Self::from_major(units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_formats_with_two_decimals() {
        assert_eq!(Amount::from_cents(123456).to_string(), "1234.56");
        assert_eq!(Amount::from_cents(5).to_string(), "0.05");
        assert_eq!(Amount::from_major(99.99).to_string(), "99.99");
    }

    #[test]
    fn whole_amounts_are_detected() {
        assert!(Amount::from_major(1200.0).is_whole());
        assert!(!Amount::from_major(1200.01).is_whole());
        assert_eq!(Amount::from_cents(123450).rounded_to_unit(), Amount::from_cents(123500));
        assert_eq!(Amount::from_cents(123449).rounded_to_unit(), Amount::from_cents(123400));
    }

    #[test]
    fn rounding_saturates_at_the_top_of_the_range() {
        let top = Amount::from_major(f64::MAX);
        assert_eq!(top.cents(), i64::MAX);
        let rounded = top.rounded_to_unit();
        assert!(rounded.is_whole());
        assert!(rounded <= top);
    }

    #[test]
    fn negative_inputs_clamp_to_zero() {
        assert_eq!(Amount::from_cents(-10), Amount::ZERO);
        assert_eq!(Amount::from_cents(100).saturating_sub(Amount::from_cents(500)), Amount::ZERO);
    }
}
