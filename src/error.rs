use thiserror::Error;

pub type Result<T, E = PaymentError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount {amount} does not fit a {decimals}-decimal fixed-point integer")]
    AmountOverflow { amount: String, decimals: u32 },
    #[error("Unknown token: {0}")]
    UnknownToken(String),
    #[error("Token {0} cannot be used to pay fees")]
    FeeTokenNotAllowed(String),
    #[error(transparent)]
    Precondition(#[from] Precondition),
}

/// Checks the orchestrator performs before any transfer is attempted.
///
/// The `Display` strings are shown to the operator verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    #[error("Wallet not connected")]
    WalletNotConnected,
    #[error("Please select Token")]
    PaymentTokenMissing,
    #[error("Please select Fee Token")]
    FeeTokenMissing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_is_shown_verbatim() {
        let err = PaymentError::from(Precondition::FeeTokenMissing);
        assert_eq!(err.to_string(), "Please select Fee Token");
    }

    #[test]
    fn test_overflow_names_amount_and_scale() {
        let err = PaymentError::AmountOverflow {
            amount: "1.5".to_string(),
            decimals: 40,
        };
        assert_eq!(
            err.to_string(),
            "Amount 1.5 does not fit a 40-decimal fixed-point integer"
        );
    }
}
