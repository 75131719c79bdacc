use crate::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ERC-20 token participating in at least one tracked pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub name: String,
    /// Zero is the sentinel for "metadata could not be determined".
    pub decimals: u32,
    pub volume: Decimal,
    pub volume_usd: Decimal,
    pub untracked_volume_usd: Decimal,
    pub fees_usd: Decimal,
    pub total_value_locked: Decimal,
    pub total_value_locked_usd: Decimal,
    /// Price in the base currency, estimated by the reference-pool search.
    pub derived_eth: Decimal,
    /// Pools pairing this token with a whitelisted one; the candidate set
    /// for price derivation.
    pub whitelist_pools: Vec<Address>,
    pub tx_count: u64,
}

impl Token {
    pub fn new(address: Address, symbol: String, name: String, decimals: u32) -> Self {
        Self {
            address,
            symbol,
            name,
            decimals,
            volume: Decimal::ZERO,
            volume_usd: Decimal::ZERO,
            untracked_volume_usd: Decimal::ZERO,
            fees_usd: Decimal::ZERO,
            total_value_locked: Decimal::ZERO,
            total_value_locked_usd: Decimal::ZERO,
            derived_eth: Decimal::ZERO,
            whitelist_pools: Vec::new(),
            tx_count: 0,
        }
    }
}
