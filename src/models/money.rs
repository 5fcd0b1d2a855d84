//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. On the wire the backend uses plain decimal numbers, so Money
//! serializes as one and rounds to the nearest cent when reading.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Represents a monetary amount stored as cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use rubik::models::Money;
    /// let amount = Money::from_cents(22050); // R$ 220,50
    /// assert_eq!(amount.reais(), 220);
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_reais(reais: i64) -> Self {
        Self(reais * 100)
    }

    /// Convert a decimal amount, rounding to the nearest cent
    pub fn from_decimal(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole currency units (truncated toward zero)
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse an amount typed by a user
    ///
    /// Accepts "150", "150.5", "150,50", "1.234,56" and "R$ 1.234,56".
    /// When a comma is present it is the decimal separator and dots are
    /// thousands separators.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.trim_start_matches("R$").trim();

        let normalized = if rest.contains(',') {
            rest.replace('.', "").replace(',', ".")
        } else {
            rest.to_string()
        };

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let cents = match normalized.split_once('.') {
            Some((whole, frac)) => {
                let whole: i64 = if whole.is_empty() {
                    0
                } else {
                    whole.parse().map_err(|_| invalid())?
                };
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let frac_cents: i64 = match frac.len() {
                    0 => 0,
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    _ => frac[..2].parse().map_err(|_| invalid())?,
                };
                whole
                    .checked_mul(100)
                    .and_then(|c| c.checked_add(frac_cents))
                    .ok_or_else(invalid)?
            }
            None => normalized
                .parse::<i64>()
                .map_err(|_| invalid())?
                .checked_mul(100)
                .ok_or_else(invalid)?,
        };

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol using Brazilian separators
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{} {},{:02}",
            sign,
            symbol,
            group_thousands(self.reais().abs()),
            self.cents_part()
        )
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("R$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Self::from_decimal(value))
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid money format: '{}'", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_brazilian_separators() {
        assert_eq!(Money::from_cents(22050).to_string(), "R$ 220,50");
        assert_eq!(Money::from_reais(1_300_000).to_string(), "R$ 1.300.000,00");
        assert_eq!(Money::from_cents(-150).to_string(), "-R$ 1,50");
        assert_eq!(Money::zero().to_string(), "R$ 0,00");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("150").unwrap(), Money::from_reais(150));
        assert_eq!(Money::parse("130.4").unwrap(), Money::from_cents(13040));
        assert_eq!(Money::parse("130,40").unwrap(), Money::from_cents(13040));
        assert_eq!(Money::parse("R$ 1.234,56").unwrap(), Money::from_cents(123456));
        assert_eq!(Money::parse("-10.50").unwrap(), Money::from_cents(-1050));
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
    }

    #[test]
    fn test_parse_rejects_amounts_too_large() {
        assert!(matches!(
            Money::parse("999999999999999999"),
            Err(MoneyParseError::InvalidFormat(_))
        ));
        assert!(Money::parse("92233720368547758,07").is_err());
        assert!(Money::parse("-999999999999999999").is_err());
        assert_eq!(
            Money::parse("90000000000000000").unwrap(),
            Money::from_cents(9_000_000_000_000_000_000)
        );
    }

    #[test]
    fn test_decimal_wire_format() {
        let money: Money = serde_json::from_str("220.5").unwrap();
        assert_eq!(money.cents(), 22050);
        assert_eq!(serde_json::to_string(&Money::from_cents(420000)).unwrap(), "4200.0");

        let rounded: Money = serde_json::from_str("0.1").unwrap();
        assert_eq!(rounded.cents(), 10);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_cents(100), Money::from_cents(250)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 350);
    }
}
