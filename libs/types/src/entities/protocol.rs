use crate::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Single global record holding the base-currency to USD rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub eth_price_usd: Decimal,
}

/// Aggregate protocol statistics, keyed by the factory address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    pub address: Address,
    pub pool_count: u64,
    pub tx_count: u64,
    pub total_volume_eth: Decimal,
    pub total_volume_usd: Decimal,
    pub untracked_volume_usd: Decimal,
    pub total_fees_eth: Decimal,
    pub total_fees_usd: Decimal,
    pub total_value_locked_eth: Decimal,
    pub total_value_locked_usd: Decimal,
    pub owner: Address,
    /// Set once by the host's backfill job; the engine never flips it.
    pub backfilled: bool,
}

impl Factory {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pool_count: 0,
            tx_count: 0,
            total_volume_eth: Decimal::ZERO,
            total_volume_usd: Decimal::ZERO,
            untracked_volume_usd: Decimal::ZERO,
            total_fees_eth: Decimal::ZERO,
            total_fees_usd: Decimal::ZERO,
            total_value_locked_eth: Decimal::ZERO,
            total_value_locked_usd: Decimal::ZERO,
            owner: Address::ZERO,
            backfilled: false,
        }
    }
}
