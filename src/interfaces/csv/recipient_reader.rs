use crate::domain::recipient::RecipientCandidate;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads recipient rows (`name,address,amount`) from a CSV source.
///
/// Rows are returned as unvalidated candidates; validation and duplicate
/// detection happen when they are added to a `RecipientQueue`.
pub struct RecipientReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RecipientReader<R> {
    /// Creates a new `RecipientReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields one candidate per data row.
    pub fn candidates(self) -> impl Iterator<Item = Result<RecipientCandidate>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}
