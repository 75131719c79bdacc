use crate::events::BlockContext;
use crate::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Liquidity position managed by the position-manager contract, keyed by
/// its externally assigned NFT token id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: u64,
    /// Zero until the first Transfer event names the real owner.
    pub owner: Address,
    pub pool: Address,
    pub token0: Address,
    pub token1: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub deposited_token0: Decimal,
    pub deposited_token1: Decimal,
    pub withdrawn_token0: Decimal,
    pub withdrawn_token1: Decimal,
    pub collected_token0: Decimal,
    pub collected_token1: Decimal,
    /// Collected minus withdrawn, i.e. the fee portion of collects.
    pub collected_fees_token0: Decimal,
    pub collected_fees_token1: Decimal,
    /// Last fee-growth-inside values read from chain state, used by
    /// consumers to compute uncollected fees.
    pub fee_growth_inside0_last: u128,
    pub fee_growth_inside1_last: u128,
    pub amount_deposited_usd: Decimal,
    pub amount_withdrawn_usd: Decimal,
    pub amount_collected_usd: Decimal,
}

impl Position {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        pool: Address,
        token0: Address,
        token1: Address,
        tick_lower: i32,
        tick_upper: i32,
        fee_growth_inside0: u128,
        fee_growth_inside1: u128,
    ) -> Self {
        Self {
            id,
            owner: Address::ZERO,
            pool,
            token0,
            token1,
            tick_lower,
            tick_upper,
            liquidity: 0,
            deposited_token0: Decimal::ZERO,
            deposited_token1: Decimal::ZERO,
            withdrawn_token0: Decimal::ZERO,
            withdrawn_token1: Decimal::ZERO,
            collected_token0: Decimal::ZERO,
            collected_token1: Decimal::ZERO,
            collected_fees_token0: Decimal::ZERO,
            collected_fees_token1: Decimal::ZERO,
            fee_growth_inside0_last: fee_growth_inside0,
            fee_growth_inside1_last: fee_growth_inside1,
            amount_deposited_usd: Decimal::ZERO,
            amount_withdrawn_usd: Decimal::ZERO,
            amount_collected_usd: Decimal::ZERO,
        }
    }

    /// Immutable copy of the mutable fields, taken after every mutating
    /// position event.
    pub fn snapshot(&self, block: &BlockContext) -> PositionSnapshot {
        PositionSnapshot {
            position_id: self.id,
            block_number: block.number,
            timestamp: block.timestamp,
            owner: self.owner,
            pool: self.pool,
            liquidity: self.liquidity,
            deposited_token0: self.deposited_token0,
            deposited_token1: self.deposited_token1,
            withdrawn_token0: self.withdrawn_token0,
            withdrawn_token1: self.withdrawn_token1,
            collected_fees_token0: self.collected_fees_token0,
            collected_fees_token1: self.collected_fees_token1,
            fee_growth_inside0_last: self.fee_growth_inside0_last,
            fee_growth_inside1_last: self.fee_growth_inside1_last,
        }
    }
}

/// Write-once history row, keyed by (position id, block number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub position_id: u64,
    pub block_number: u64,
    pub timestamp: u64,
    pub owner: Address,
    pub pool: Address,
    pub liquidity: u128,
    pub deposited_token0: Decimal,
    pub deposited_token1: Decimal,
    pub withdrawn_token0: Decimal,
    pub withdrawn_token1: Decimal,
    pub collected_fees_token0: Decimal,
    pub collected_fees_token1: Decimal,
    pub fee_growth_inside0_last: u128,
    pub fee_growth_inside1_last: u128,
}
