//! Amount type for whole-won monetary values.
//!
//! Every money field in the ledger is a whole number of KRW, so `Amount` wraps
//! an `i64` rather than a decimal type. Parsing tolerates comma-grouped strings
//! (`"1,234,000"`), and display always re-inserts the grouping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;
use tracing::warn;

/// A whole-won amount.
///
/// Formatting is not significant for equality: `Amount` compares by value, and
/// `to_string` always produces the comma-grouped form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Creates a new `Amount` from a whole-won value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying value in won.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parses a stored cell, coercing anything unparsable to zero.
    ///
    /// Stored rows are never trusted to be well-formed; a cell that does not
    /// parse is treated as zero (with a warning) instead of failing the load.
    pub fn parse_lossy(s: &str) -> Self {
        match s.parse::<Amount>() {
            Ok(amount) => amount,
            Err(_) => {
                if !s.trim().is_empty() {
                    warn!("Coercing unparsable amount '{s}' to 0");
                }
                Amount::default()
            }
        }
    }

    /// The plain digit form used in storage, e.g. `-1234000`.
    pub fn to_storage(self) -> String {
        self.0.to_string()
    }
}

impl FromStr for Amount {
    type Err = anyhow::Error;

    /// Accepts plain digits, comma-grouped digits, and an optional leading
    /// `₩`, with or without a sign: `40000`, `-40,000`, `₩3,000,000`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .trim_start_matches('₩')
            .chars()
            .filter(|c| *c != ',')
            .collect();
        let value = cleaned
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("'{s}' is not a valid amount: {e}"))?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if self.0 < 0 {
            write!(f, "-{grouped}")
        } else {
            write!(f, "{grouped}")
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(value)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::default(), |acc, a| acc + a)
    }
}

/// Average income per delivery, rounded to the nearest won. Zero when there
/// are no deliveries.
pub fn average_unit_price(income: Amount, count: u32) -> Amount {
    if count == 0 {
        return Amount::default();
    }
    Amount(((income.0 as f64) / (count as f64)).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(Amount::from_str("40000").unwrap(), Amount::new(40_000));
        assert_eq!(Amount::from_str("-500").unwrap(), Amount::new(-500));
        assert_eq!(Amount::from_str("0").unwrap(), Amount::new(0));
    }

    #[test]
    fn test_parse_commas_and_symbol() {
        assert_eq!(
            Amount::from_str("3,000,000").unwrap(),
            Amount::new(3_000_000)
        );
        assert_eq!(Amount::from_str("₩40,000").unwrap(), Amount::new(40_000));
        assert_eq!(Amount::from_str(" -40,000 ").unwrap(), Amount::new(-40_000));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("12.5").is_err());
    }

    #[test]
    fn test_parse_lossy() {
        assert_eq!(Amount::parse_lossy("50,000"), Amount::new(50_000));
        assert_eq!(Amount::parse_lossy("garbage"), Amount::new(0));
        assert_eq!(Amount::parse_lossy(""), Amount::new(0));
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Amount::new(0).to_string(), "0");
        assert_eq!(Amount::new(999).to_string(), "999");
        assert_eq!(Amount::new(1_000).to_string(), "1,000");
        assert_eq!(Amount::new(3_000_000).to_string(), "3,000,000");
        assert_eq!(Amount::new(-40_000).to_string(), "-40,000");
    }

    #[test]
    fn test_storage_form() {
        assert_eq!(Amount::new(1_234_000).to_storage(), "1234000");
        assert_eq!(Amount::new(-7).to_storage(), "-7");
    }

    #[test]
    fn test_arithmetic() {
        let total = Amount::new(30_000) + Amount::new(20_000);
        assert_eq!(total, Amount::new(50_000));
        assert_eq!(total - Amount::new(10_000), Amount::new(40_000));
        let sum: Amount = vec![Amount::new(1), Amount::new(2), Amount::new(3)]
            .into_iter()
            .sum();
        assert_eq!(sum, Amount::new(6));
    }

    #[test]
    fn test_average_unit_price() {
        assert_eq!(
            average_unit_price(Amount::new(50_000), 5),
            Amount::new(10_000)
        );
        assert_eq!(average_unit_price(Amount::new(50_000), 0), Amount::new(0));
        // Rounds to nearest rather than truncating.
        assert_eq!(average_unit_price(Amount::new(10_000), 3), Amount::new(3_333));
        assert_eq!(average_unit_price(Amount::new(20_000), 3), Amount::new(6_667));
    }
}
