//! Decoded on-chain events and their block context.
//!
//! Log decoding itself is the host's job; the engine only sees these typed
//! payloads, delivered one at a time in canonical
//! (block number, transaction index, log index) order.

use crate::Address;
use serde::{Deserialize, Serialize};

/// Block information attached to every delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    pub number: u64,
    pub timestamp: u64,
}

/// A single decoded event from the factory, a pool, or the position manager.
///
/// Raw token amounts are unscaled integers exactly as emitted; the engine
/// converts them to decimals using the token records' `decimals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Factory deployed a new pool.
    PoolCreated {
        pool: Address,
        token0: Address,
        token1: Address,
        fee: u32,
    },
    /// Pool received its starting price; `tick` is defined from here on.
    Initialize {
        pool: Address,
        sqrt_price: u128,
        tick: i32,
    },
    Mint {
        pool: Address,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        /// Liquidity added to the range.
        amount: u128,
        amount0: u128,
        amount1: u128,
    },
    Burn {
        pool: Address,
        tick_lower: i32,
        tick_upper: i32,
        /// Liquidity removed from the range.
        amount: u128,
        amount0: u128,
        amount1: u128,
    },
    Swap {
        pool: Address,
        /// Signed deltas from the pool's perspective.
        amount0: i128,
        amount1: i128,
        sqrt_price: u128,
        liquidity: u128,
        tick: i32,
    },
    /// Pool-level fee collection.
    Collect {
        pool: Address,
        amount0: u128,
        amount1: u128,
    },
    Flash { pool: Address },
    /// Position manager events, keyed by the NFT token id.
    IncreaseLiquidity {
        position_id: u64,
        liquidity: u128,
        amount0: u128,
        amount1: u128,
    },
    DecreaseLiquidity {
        position_id: u64,
        liquidity: u128,
        amount0: u128,
        amount1: u128,
    },
    CollectPosition {
        position_id: u64,
        amount0: u128,
        amount1: u128,
    },
    TransferPosition { position_id: u64, to: Address },
}

impl Event {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::PoolCreated { .. } => "pool_created",
            Event::Initialize { .. } => "initialize",
            Event::Mint { .. } => "mint",
            Event::Burn { .. } => "burn",
            Event::Swap { .. } => "swap",
            Event::Collect { .. } => "collect",
            Event::Flash { .. } => "flash",
            Event::IncreaseLiquidity { .. } => "increase_liquidity",
            Event::DecreaseLiquidity { .. } => "decrease_liquidity",
            Event::CollectPosition { .. } => "collect_position",
            Event::TransferPosition { .. } => "transfer_position",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_round_trip_through_json() {
        let event = Event::Swap {
            pool: Address::ZERO,
            amount0: -42,
            amount1: 42,
            sqrt_price: 1 << 96,
            liquidity: 1_000,
            tick: -887_220,
        };
        let encoded = serde_json::to_string(&event).unwrap();
        let decoded: Event = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.kind(), "swap");
    }
}
