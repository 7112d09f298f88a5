use super::address::Address;
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};

/// A fungible token the operator can pay with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub address: Address,
    pub decimals: u32,
    #[serde(default)]
    pub can_be_used_for_fee: bool,
}

impl Token {
    pub fn new(symbol: &str, address: Address, decimals: u32, can_be_used_for_fee: bool) -> Self {
        Self {
            symbol: symbol.to_string(),
            address,
            decimals,
            can_be_used_for_fee,
        }
    }
}

/// Ordered, read-only list of known tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl TokenRegistry {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn all(&self) -> &[Token] {
        &self.tokens
    }

    pub fn by_address(&self, address: &Address) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.address == address)
    }

    /// Looks a token up by symbol (case-insensitive) or by address.
    pub fn resolve(&self, symbol_or_address: &str) -> Result<&Token> {
        let needle = symbol_or_address.trim();
        let found = match Address::parse(needle) {
            Ok(address) => self.by_address(&address),
            Err(_) => self
                .tokens
                .iter()
                .find(|t| t.symbol.eq_ignore_ascii_case(needle)),
        };
        found.ok_or_else(|| PaymentError::UnknownToken(needle.to_string()))
    }

    /// Resolves a fee token, refusing tokens that cannot pay fees.
    pub fn resolve_fee_token(&self, symbol_or_address: &str) -> Result<&Token> {
        let token = self.resolve(symbol_or_address)?;
        if token.can_be_used_for_fee {
            Ok(token)
        } else {
            Err(PaymentError::FeeTokenNotAllowed(token.symbol.clone()))
        }
    }

    pub fn fee_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.can_be_used_for_fee)
    }

    /// The second configured token, or the first when only one exists.
    pub fn default_payment_token(&self) -> Option<&Token> {
        self.tokens.get(1).or_else(|| self.tokens.first())
    }

    pub fn decimals_for(&self, address: &Address) -> Option<u32> {
        self.by_address(address).map(|t| t.decimals)
    }
}
