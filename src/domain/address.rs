use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const PREFIX: &str = "0x";
const HEX_LEN: usize = 40;

/// A 20-byte account address written as `0x` followed by 40 hex digits.
///
/// The original casing is kept for display and submission. Equality and
/// hashing use the lowercase form, so checksummed and lowercase spellings of
/// the same account compare equal.
#[derive(Debug, Clone, Eq)]
pub struct Address(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAddress;

impl Address {
    pub fn parse(input: &str) -> Result<Self, InvalidAddress> {
        let trimmed = input.trim();
        let hex = trimmed.strip_prefix(PREFIX).ok_or(InvalidAddress)?;
        if hex.len() == HEX_LEN && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidAddress)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used for identity comparisons.
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl FromStr for Address {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for InvalidAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid address")
    }
}

impl std::error::Error for InvalidAddress {}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}
