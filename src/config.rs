//! Runtime configuration: target network, token list and orchestrator tuning.
//!
//! Every field has a default matching the Tempo testnet, so an empty JSON
//! object (or no file at all) yields a usable configuration.

use crate::domain::address::Address;
use crate::domain::token::{Token, TokenRegistry};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CHAIN_ID: u64 = 42429;
pub const DEFAULT_EXPLORER_URL: &str = "https://explore.tempo.xyz";
pub const DEFAULT_RPC_URL: &str = "https://rpc.testnet.tempo.xyz";
pub const DEFAULT_INTER_TRANSFER_DELAY_MS: u64 = 2000;
pub const DEFAULT_LOG_CAPACITY: usize = 15;
pub const DEFAULT_DECIMALS: u32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub tokens: Vec<Token>,
    pub orchestrator: OrchestratorConfig,
}

impl AppConfig {
    /// Loads a JSON config file, or the built-in defaults when `path` is `None`.
    ///
    /// An empty `tokens` list in the file falls back to the default tokens.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let reader = BufReader::new(File::open(path)?);
                serde_json::from_reader(reader)?
            }
            None => Self::default(),
        };
        if config.tokens.is_empty() {
            config.tokens = default_tokens();
        }
        Ok(config)
    }

    pub fn token_registry(&self) -> TokenRegistry {
        TokenRegistry::new(self.tokens.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub supported_chain_ids: Vec<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            name: "Tempo Testnet".to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            supported_chain_ids: vec![DEFAULT_CHAIN_ID],
        }
    }
}

impl NetworkConfig {
    pub fn is_chain_supported(&self, chain_id: u64) -> bool {
        self.supported_chain_ids.contains(&chain_id)
    }

    /// Explorer page for a transaction: `{explorer_url}/tx/{hash}`.
    pub fn tx_link(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Pause between consecutive submissions from the same account.
    pub inter_transfer_delay_ms: u64,
    /// How many console entries a caller-side log keeps.
    pub log_capacity: usize,
    /// Used when the selected payment token is not in the token list.
    pub default_decimals: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            inter_transfer_delay_ms: DEFAULT_INTER_TRANSFER_DELAY_MS,
            log_capacity: DEFAULT_LOG_CAPACITY,
            default_decimals: DEFAULT_DECIMALS,
        }
    }
}

impl OrchestratorConfig {
    pub fn inter_transfer_delay(&self) -> Duration {
        Duration::from_millis(self.inter_transfer_delay_ms)
    }
}

/// Stablecoins deployed on the Tempo testnet.
pub fn default_tokens() -> Vec<Token> {
    [
        ("PathUSD", 0u8, true),
        ("AlphaUSD", 1, true),
        ("BetaUSD", 2, true),
        ("ThetaUSD", 3, false),
    ]
    .into_iter()
    .filter_map(|(symbol, suffix, fee)| {
        let address = Address::parse(&format!("0x20c0{:036x}", suffix)).ok()?;
        Some(Token::new(symbol, address, DEFAULT_DECIMALS, fee))
    })
    .collect()
}
