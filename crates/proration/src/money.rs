//! Exact currency amounts

use crate::{BillingError, Result};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An amount in currency minor units (cents).
///
/// Amounts are kept as integers so prorated values round exactly once, at
/// the cent, and sums of rounded parts never drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero cents
    pub const ZERO: Money = Money(0);

    /// Create an amount from a number of cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from major units (e.g. euros), rounded to the cent.
    ///
    /// The float is read through its shortest decimal representation, so
    /// `1.005` rounds to `1.01` like the written number would.
    ///
    /// # Examples
    /// ```
    /// use proration::Money;
    /// assert_eq!(Money::from_major(900.0).unwrap().cents(), 90_000);
    /// assert_eq!(Money::from_major(12.345).unwrap().cents(), 1_235);
    /// assert!(Money::from_major(f64::NAN).is_err());
    /// ```
    pub fn from_major(amount: f64) -> Result<Self> {
        if !amount.is_finite() {
            return Err(BillingError::InvalidAmount(amount.to_string()));
        }
        amount.to_string().parse()
    }

    /// Amount in cents
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Amount in major units, for display and JSON
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Sum of two amounts, `None` on overflow
    pub const fn checked_add(self, rhs: Money) -> Option<Money> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// True when the amount is below zero
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Scale the amount by `numerator / denominator`, rounding half away
    /// from zero to the nearest cent.
    ///
    /// A zero denominator yields `Money::ZERO`.
    ///
    /// # Examples
    /// ```
    /// use proration::Money;
    /// // 900.00 * 17 / 31 = 493.548...
    /// assert_eq!(Money::from_cents(90_000).prorate(17, 31).cents(), 49_355);
    /// ```
    pub fn prorate(self, numerator: u32, denominator: u32) -> Money {
        if denominator == 0 {
            return Money::ZERO;
        }

        let scaled = i128::from(self.0) * i128::from(numerator);
        let den = i128::from(denominator);
        let magnitude = (2 * scaled.abs() + den) / (2 * den);
        let cents = if scaled < 0 { -magnitude } else { magnitude };

        Money(i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = BillingError;

    /// Parse decimal text such as `900`, `900.5`, `1 234,56` or `75 €`.
    ///
    /// Either `.` or `,` is accepted as the decimal separator; spaces and the
    /// euro sign are ignored. Digits past the cent round half away from zero.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BillingError::InvalidAmount(s.to_string());

        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '\u{202f}' | '_' | '€'))
            .collect();

        let (negative, unsigned) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
        };

        let normalized = unsigned.replace(',', ".");
        let mut parts = normalized.split('.');
        let whole = parts.next().unwrap_or_default();
        let frac = parts.next().unwrap_or_default();

        if parts.next().is_some() || (whole.is_empty() && frac.is_empty()) {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        let mut digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        let cents = whole_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Money::from_major(n).map_err(de::Error::custom),
            Repr::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(49_355).to_string(), "493.55");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-50).to_string(), "-0.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_parse_plain_and_french() {
        assert_eq!("900".parse::<Money>().unwrap().cents(), 90_000);
        assert_eq!("900.5".parse::<Money>().unwrap().cents(), 90_050);
        assert_eq!("1 234,56".parse::<Money>().unwrap().cents(), 123_456);
        assert_eq!("75 €".parse::<Money>().unwrap().cents(), 7_500);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("-12.30".parse::<Money>().unwrap().cents(), -1_230);
    }

    #[test]
    fn test_parse_rounds_extra_digits() {
        assert_eq!("12.345".parse::<Money>().unwrap().cents(), 1_235);
        assert_eq!("12.344".parse::<Money>().unwrap().cents(), 1_234);
        assert_eq!("0.999".parse::<Money>().unwrap().cents(), 100);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("1e5".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_from_major() {
        assert_eq!(Money::from_major(1.005).unwrap().cents(), 101);
        assert_eq!(Money::from_major(0.1 + 0.2).unwrap().cents(), 30);
        assert!(Money::from_major(f64::INFINITY).is_err());
    }

    #[test]
    fn test_prorate_rounding() {
        // 100.00 * 17 / 31 = 54.838...
        assert_eq!(Money::from_cents(10_000).prorate(17, 31).cents(), 5_484);
        // exactly half a cent rounds away from zero
        assert_eq!(Money::from_cents(1).prorate(1, 2).cents(), 1);
        assert_eq!(Money::from_cents(-1).prorate(1, 2).cents(), -1);
        assert_eq!(Money::from_cents(10_000).prorate(31, 31).cents(), 10_000);
        assert_eq!(Money::from_cents(10_000).prorate(3, 0), Money::ZERO);
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(
            Money::from_cents(49_355).checked_add(Money::from_cents(5_484)),
            Some(Money::from_cents(54_839))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_serde_accepts_numbers_and_text() {
        let m: Money = serde_json::from_str("900").unwrap();
        assert_eq!(m.cents(), 90_000);
        let m: Money = serde_json::from_str("493.55").unwrap();
        assert_eq!(m.cents(), 49_355);
        let m: Money = serde_json::from_str("\"1 234,56\"").unwrap();
        assert_eq!(m.cents(), 123_456);
        assert_eq!(
            serde_json::to_string(&Money::from_cents(49_355)).unwrap(),
            "493.55"
        );
    }
}
