use crate::domain::address::Address;
use crate::domain::recipient::{
    DUPLICATE_ADDRESS_ERROR, Field, FieldErrors, Recipient, RecipientCandidate, RecipientId,
    RecipientPatch, validate,
};
use crate::error::Result;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

/// The ordered list of payees waiting to be paid.
///
/// Insertion order is payment order. Every entry passed field validation on
/// the way in and no two entries share an address, so the queue is always
/// safe to hand to the orchestrator as a snapshot.
#[derive(Debug, Default)]
pub struct RecipientQueue {
    recipients: Vec<Recipient>,
    errors: FieldErrors,
    next_id: u64,
}

impl RecipientQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a recipient.
    ///
    /// On rejection the queue is untouched and the field errors are both
    /// returned and kept as the pending error state (see [`Self::errors`]).
    pub fn add(&mut self, candidate: RecipientCandidate) -> Result<Recipient, FieldErrors> {
        let valid = match validate(&candidate) {
            Ok(valid) => valid,
            Err(errors) => return Err(self.reject(errors)),
        };

        if self.contains_address(&valid.address) {
            return Err(self.reject(FieldErrors::single(
                Field::Address,
                DUPLICATE_ADDRESS_ERROR,
            )));
        }

        self.next_id += 1;
        let recipient = Recipient {
            id: RecipientId(self.next_id),
            name: valid.name,
            address: valid.address,
            amount: valid.amount,
            added_at: Utc::now(),
        };
        debug!(id = %recipient.id, address = %recipient.address, "recipient queued");

        self.recipients.push(recipient.clone());
        self.errors = FieldErrors::new();
        Ok(recipient)
    }

    /// Removes the entry with `id`. An unknown id is a no-op.
    pub fn remove(&mut self, id: RecipientId) -> Option<Recipient> {
        let index = self.recipients.iter().position(|r| r.id == id)?;
        debug!(%id, "recipient removed");
        Some(self.recipients.remove(index))
    }

    /// Merges `patch` into the entry with `id` without re-running the
    /// duplicate check. Returns `false` when no such entry exists.
    pub fn update(&mut self, id: RecipientId, patch: RecipientPatch) -> bool {
        let Some(recipient) = self.recipients.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if let Some(name) = patch.name {
            recipient.name = name;
        }
        if let Some(address) = patch.address {
            recipient.address = address;
        }
        if let Some(amount) = patch.amount {
            recipient.amount = amount;
        }
        true
    }

    pub fn clear(&mut self) {
        debug!(count = self.recipients.len(), "queue cleared");
        self.recipients.clear();
        self.errors = FieldErrors::new();
    }

    pub fn get(&self, id: RecipientId) -> Option<&Recipient> {
        self.recipients.iter().find(|r| r.id == id)
    }

    /// Field errors from the most recent rejected `add`, if it was not
    /// followed by a successful `add` or a `clear`.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.iter()
    }

    /// An owned copy for a payment run; later queue edits do not reach it.
    pub fn snapshot(&self) -> Vec<Recipient> {
        self.recipients.clone()
    }

    pub fn total_amount(&self) -> Decimal {
        self.recipients.iter().map(|r| r.amount.value()).sum()
    }

    pub fn to_address_list(&self) -> Vec<Address> {
        self.recipients.iter().map(|r| r.address.clone()).collect()
    }

    /// Amounts as fixed-point integers scaled by `10^decimals`.
    pub fn to_amount_list(&self, decimals: u32) -> Result<Vec<u128>> {
        self.recipients
            .iter()
            .map(|r| r.amount.to_fixed_point(decimals))
            .collect()
    }

    fn contains_address(&self, address: &Address) -> bool {
        self.recipients.iter().any(|r| &r.address == address)
    }

    fn reject(&mut self, errors: FieldErrors) -> FieldErrors {
        debug!(%errors, "recipient rejected");
        self.errors = errors.clone();
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::Amount;
    use crate::domain::recipient::{ADDRESS_ERROR, NAME_ERROR};
    use rust_decimal_macros::dec;

    const A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn candidate(name: &str, address: &str, amount: &str) -> RecipientCandidate {
        RecipientCandidate::new(name, address, amount)
    }

    #[test]
    fn test_add_assigns_fresh_ids_in_order() {
        let mut queue = RecipientQueue::new();
        let first = queue.add(candidate("Alice", A, "10")).unwrap();
        let second = queue.add(candidate("Bob", B, "20.5")).unwrap();

        assert_ne!(first.id, second.id);
        let names: Vec<_> = queue.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_add_sanitizes_name() {
        let mut queue = RecipientQueue::new();
        let recipient = queue.add(candidate("  <Carol>  ", A, "1")).unwrap();
        assert_eq!(recipient.name, "Carol");
    }

    #[test]
    fn test_duplicate_address_is_case_insensitive() {
        let mut queue = RecipientQueue::new();
        queue.add(candidate("Alice", A, "10")).unwrap();

        let errors = queue
            .add(candidate("Alias", &A.to_uppercase().replacen("0X", "0x", 1), "5"))
            .unwrap_err();

        assert_eq!(errors.get(Field::Address), Some(DUPLICATE_ADDRESS_ERROR));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.errors(), &errors);
    }

    #[test]
    fn test_failed_add_leaves_queue_unchanged() {
        let mut queue = RecipientQueue::new();
        queue.add(candidate("Alice", A, "10")).unwrap();
        let before = queue.snapshot();

        let errors = queue.add(candidate("", "nope", "0")).unwrap_err();
        assert_eq!(errors.get(Field::Name), Some(NAME_ERROR));
        assert_eq!(errors.get(Field::Address), Some(ADDRESS_ERROR));
        assert_eq!(queue.snapshot(), before);
    }

    #[test]
    fn test_successful_add_clears_pending_errors() {
        let mut queue = RecipientQueue::new();
        queue.add(candidate("", A, "1")).unwrap_err();
        assert!(!queue.errors().is_empty());

        queue.add(candidate("Alice", A, "1")).unwrap();
        assert!(queue.errors().is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut queue = RecipientQueue::new();
        queue.add(candidate("Alice", A, "10")).unwrap();
        assert!(queue.remove(RecipientId(999)).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_remove() {
        let mut queue = RecipientQueue::new();
        let first = queue.add(candidate("Alice", A, "10")).unwrap();
        queue.remove(first.id).unwrap();
        let again = queue.add(candidate("Alice", A, "10")).unwrap();
        assert_ne!(first.id, again.id);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut queue = RecipientQueue::new();
        let alice = queue.add(candidate("Alice", A, "10")).unwrap();

        let updated = queue.update(
            alice.id,
            RecipientPatch {
                amount: Some(Amount::new(dec!(11)).unwrap()),
                ..Default::default()
            },
        );
        assert!(updated);

        let stored = queue.get(alice.id).unwrap();
        assert_eq!(stored.name, "Alice");
        assert_eq!(stored.amount.value(), dec!(11));

        assert!(!queue.update(RecipientId(42), RecipientPatch::default()));
    }

    #[test]
    fn test_clear_empties_queue_and_errors() {
        let mut queue = RecipientQueue::new();
        queue.add(candidate("Alice", A, "10")).unwrap();
        queue.add(candidate("Alice", A, "10")).unwrap_err();

        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.errors().is_empty());
    }

    #[test]
    fn test_total_amount() {
        let mut queue = RecipientQueue::new();
        assert_eq!(queue.total_amount(), Decimal::ZERO);

        queue.add(candidate("Alice", A, "10")).unwrap();
        queue.add(candidate("Bob", B, "20.5")).unwrap();
        assert_eq!(queue.total_amount(), dec!(30.5));
    }

    #[test]
    fn test_projections() {
        let mut queue = RecipientQueue::new();
        queue.add(candidate("Alice", A, "12.5")).unwrap();
        queue.add(candidate("Bob", B, "0.1")).unwrap();

        assert_eq!(queue.to_amount_list(6).unwrap(), vec![12_500_000, 100_000]);
        let addresses: Vec<_> = queue.to_address_list().iter().map(|a| a.to_string()).collect();
        assert_eq!(addresses, vec![A.to_string(), B.to_string()]);
    }
}
