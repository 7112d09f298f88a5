use super::address::Address;
use super::amount::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const NAME_MIN_LEN: usize = 1;
pub const NAME_MAX_LEN: usize = 100;

pub const NAME_ERROR: &str = "Name is required and must be between 1-100 characters";
pub const ADDRESS_ERROR: &str = "Invalid address";
pub const AMOUNT_ERROR: &str = "Amount must be a positive number";
pub const DUPLICATE_ADDRESS_ERROR: &str = "This address already exists in the list";

/// Queue-assigned identifier, unique for the lifetime of a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipientId(pub u64);

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated payee waiting in the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: RecipientId,
    pub name: String,
    pub address: Address,
    pub amount: Amount,
    /// Informational only; never used for ordering.
    pub added_at: DateTime<Utc>,
}

/// Raw operator input for a new recipient, as typed into a form or read
/// from a CSV row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientCandidate {
    pub name: String,
    pub address: String,
    pub amount: String,
}

impl RecipientCandidate {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            amount: amount.into(),
        }
    }
}

/// Fields to merge into an existing recipient. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipientPatch {
    pub name: Option<String>,
    pub address: Option<Address>,
    pub amount: Option<Amount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Address,
    Amount,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Address => "address",
            Field::Amount => "amount",
        };
        f.write_str(name)
    }
}

/// Field name to human-readable message, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Strips angle brackets and surrounding whitespace from free text.
pub fn sanitize(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

/// The per-field checks, without the queue-wide duplicate check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCandidate {
    pub name: String,
    pub address: Address,
    pub amount: Amount,
}

pub fn validate(candidate: &RecipientCandidate) -> Result<ValidCandidate, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = sanitize(&candidate.name);
    let name_len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
        errors.insert(Field::Name, NAME_ERROR);
    }

    let address = Address::parse(&candidate.address);
    if address.is_err() {
        errors.insert(Field::Address, ADDRESS_ERROR);
    }

    let amount = Amount::parse(&candidate.amount);
    if amount.is_none() {
        errors.insert(Field::Amount, AMOUNT_ERROR);
    }

    match (address, amount) {
        (Ok(address), Some(amount)) if errors.is_empty() => Ok(ValidCandidate {
            name,
            address,
            amount,
        }),
        _ => Err(errors),
    }
}
