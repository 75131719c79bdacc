//! Read-only chain state seam and the call-gate cost policy.
//!
//! All methods are synchronous read-throughs on the event-processing
//! critical path. Unavailability is a value, never an error: a reverted
//! call or an uninitialized tick simply returns `None`, and the caller
//! keeps whatever it already had stored.

use poolview_types::Address;
use serde::{Deserialize, Serialize};

/// Fee growth accrued on the far side of a tick, as reported by the pool
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFeeGrowth {
    pub fee_growth_outside0: u128,
    pub fee_growth_outside1: u128,
}

/// Global fee-growth accumulators of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolFeeGrowth {
    pub fee_growth_global0: u128,
    pub fee_growth_global1: u128,
}

/// Result of the position manager's `positions(tokenId)` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionParams {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub fee_growth_inside0: u128,
    pub fee_growth_inside1: u128,
}

/// ERC-20 metadata, resolved by the host (with whatever static fallback
/// tables it keeps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
}

/// Read-only queries against live or historical contract state.
pub trait ChainStateAccessor {
    /// Fee growth outside a tick. `None` when the tick is not initialized
    /// on-chain, which is expected for most indices.
    fn tick_fee_growth(&self, pool: &Address, tick_index: i32) -> Option<TickFeeGrowth>;

    /// Position parameters by NFT token id. `None` when the call reverts,
    /// which happens for positions minted and burned in the same block.
    fn position_params(&self, position_id: u64) -> Option<PositionParams>;

    /// Factory lookup recovering a pool address from its token pair.
    fn pool_for_pair(&self, token0: &Address, token1: &Address, fee: u32)
        -> Option<Address>;

    /// Current global fee-growth accumulators of a pool.
    fn pool_fee_growth(&self, pool: &Address) -> Option<PoolFeeGrowth>;

    /// Symbol/name/decimals of a token contract.
    fn token_metadata(&self, token: &Address) -> Option<TokenMetadata>;
}

/// History up to this block was fully indexed without chain-state calls,
/// so replays over it never need them.
pub const INDEXED_CHECKPOINT_BLOCK: u64 = 5_215_174;

/// Cost-control policy for chain-state calls.
///
/// Purely an optimization: suppressed calls only leave fee-growth fields
/// stale on already-settled history, never incorrect derived state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallGate {
    pub checkpoint_block: u64,
}

impl Default for CallGate {
    fn default() -> Self {
        Self {
            checkpoint_block: INDEXED_CHECKPOINT_BLOCK,
        }
    }
}

impl CallGate {
    pub fn new(checkpoint_block: u64) -> Self {
        Self { checkpoint_block }
    }

    /// Whether an accessor call is worth issuing at this height.
    pub fn should_call(&self, block_number: u64) -> bool {
        block_number > self.checkpoint_block
    }
}
