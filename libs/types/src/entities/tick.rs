use crate::events::BlockContext;
use crate::Address;
use serde::{Deserialize, Serialize};

/// Per-tick liquidity counters and fee-growth snapshot, keyed by
/// (pool address, tick index).
///
/// For any pool the `liquidity_net` values of all its ticks sum to zero:
/// every mint adds `+amount` at the lower boundary and `-amount` at the
/// upper one, and burns apply the mirror image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub pool: Address,
    pub index: i32,
    /// Total liquidity referencing this tick as a range boundary.
    pub liquidity_gross: u128,
    /// Signed delta applied when price crosses this tick upward.
    pub liquidity_net: i128,
    /// Fee growth accrued on the far side of this tick from the pool's
    /// current price. Only meaningful once the tick has been touched by a
    /// mint/burn or crossed by a swap; refreshed from chain state.
    pub fee_growth_outside0: u128,
    pub fee_growth_outside1: u128,
    pub created_at_block: u64,
    pub created_at_timestamp: u64,
}

impl Tick {
    pub fn new(pool: Address, index: i32, block: &BlockContext) -> Self {
        Self {
            pool,
            index,
            liquidity_gross: 0,
            liquidity_net: 0,
            fee_growth_outside0: 0,
            fee_growth_outside1: 0,
            created_at_block: block.number,
            created_at_timestamp: block.timestamp,
        }
    }
}
