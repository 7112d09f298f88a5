use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strictly positive payment amount in whole token units.
///
/// Wraps `rust_decimal::Decimal` so amounts never pass through binary
/// floating point on their way to the fixed-point integer the network expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::InvalidAmount(
                "Amount must be positive".to_string(),
            ))
        }
    }

    /// Parses operator input such as `"12.5"` or `" 7 "`.
    ///
    /// Only ASCII digits with at most one `.` are accepted. Signs, exponents,
    /// digit separators, `NaN` and infinities are rejected.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let plain = trimmed.chars().all(|c| c.is_ascii_digit() || c == '.')
            && trimmed.matches('.').count() <= 1
            && trimmed.chars().any(|c| c.is_ascii_digit());
        if !plain {
            return None;
        }
        let value = Decimal::from_str(trimmed).ok()?;
        (value > Decimal::ZERO).then_some(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Scales the amount to an integer count of `10^-decimals` units.
    ///
    /// Works on the decimal text: the fraction is right-padded with zeros or
    /// truncated to exactly `decimals` digits and glued to the whole part.
    pub fn to_fixed_point(&self, decimals: u32) -> Result<u128> {
        scale_decimal_str(&self.0.to_string(), decimals)
    }
}

fn scale_decimal_str(text: &str, decimals: u32) -> Result<u128> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let width = decimals as usize;
    let mut digits = String::with_capacity(whole.len() + width);
    digits.push_str(whole);
    digits.extend(fraction.chars().chain(std::iter::repeat('0')).take(width));

    digits
        .parse::<u128>()
        .map_err(|_| PaymentError::AmountOverflow {
            amount: text.to_string(),
            decimals,
        })
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
