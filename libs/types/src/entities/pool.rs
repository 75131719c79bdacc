use crate::events::BlockContext;
use crate::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Derived view of one AMM pool contract, keyed by its address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub address: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee_tier: u32,
    /// Tick after the most recently observed swap. `None` until the
    /// pool's Initialize event has been seen.
    pub tick: Option<i32>,
    pub sqrt_price: u128,
    /// In-range liquidity reported by the latest swap.
    pub liquidity: u128,
    pub fee_growth_global0: u128,
    pub fee_growth_global1: u128,
    /// token0 denominated in token1, and the reciprocal.
    pub token0_price: Decimal,
    pub token1_price: Decimal,
    pub volume_token0: Decimal,
    pub volume_token1: Decimal,
    pub volume_usd: Decimal,
    pub untracked_volume_usd: Decimal,
    pub fees_usd: Decimal,
    pub collected_fees_token0: Decimal,
    pub collected_fees_token1: Decimal,
    pub collected_fees_usd: Decimal,
    pub total_value_locked_token0: Decimal,
    pub total_value_locked_token1: Decimal,
    pub total_value_locked_eth: Decimal,
    pub total_value_locked_usd: Decimal,
    pub tx_count: u64,
    pub created_at_block: u64,
    pub created_at_timestamp: u64,
}

impl Pool {
    /// Fresh record with every accumulator zeroed.
    pub fn new(
        address: Address,
        token0: Address,
        token1: Address,
        fee_tier: u32,
        block: &BlockContext,
    ) -> Self {
        Self {
            address,
            token0,
            token1,
            fee_tier,
            tick: None,
            sqrt_price: 0,
            liquidity: 0,
            fee_growth_global0: 0,
            fee_growth_global1: 0,
            token0_price: Decimal::ZERO,
            token1_price: Decimal::ZERO,
            volume_token0: Decimal::ZERO,
            volume_token1: Decimal::ZERO,
            volume_usd: Decimal::ZERO,
            untracked_volume_usd: Decimal::ZERO,
            fees_usd: Decimal::ZERO,
            collected_fees_token0: Decimal::ZERO,
            collected_fees_token1: Decimal::ZERO,
            collected_fees_usd: Decimal::ZERO,
            total_value_locked_token0: Decimal::ZERO,
            total_value_locked_token1: Decimal::ZERO,
            total_value_locked_eth: Decimal::ZERO,
            total_value_locked_usd: Decimal::ZERO,
            tx_count: 0,
            created_at_block: block.number,
            created_at_timestamp: block.timestamp,
        }
    }
}
