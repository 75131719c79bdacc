//! Per-tick liquidity bookkeeping and the tick-crossing walk.

use crate::chain::{CallGate, ChainStateAccessor};
use crate::error::StateError;
use crate::store::EntityStore;
use poolview_types::{Address, BlockContext, Tick};
use tracing::{debug, error, warn};

/// Ticks crossed beyond this bound are not refreshed for a single swap.
/// Jumps this large only show up around pool initialization; later swaps
/// and explicit collects catch the affected ticks up.
pub const DEFAULT_MAX_CROSSED_TICKS: i32 = 100;

/// Keeps tick liquidity counters and fee-growth snapshots consistent as
/// liquidity is added, removed, or the active price crosses boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickLedger {
    pub max_crossed_ticks: i32,
}

impl Default for TickLedger {
    fn default() -> Self {
        Self {
            max_crossed_ticks: DEFAULT_MAX_CROSSED_TICKS,
        }
    }
}

impl TickLedger {
    /// Record minted liquidity at both boundary ticks, creating them on
    /// first reference, then refresh their fee growth from chain state.
    ///
    /// The net-liquidity convention (`+amount` at the lower boundary,
    /// `-amount` at the upper) keeps the per-pool sum of `liquidity_net`
    /// at zero.
    pub fn on_mint<S, C>(
        &self,
        store: &mut S,
        chain: &C,
        gate: &CallGate,
        block: &BlockContext,
        pool: &Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) where
        S: EntityStore,
        C: ChainStateAccessor,
    {
        for (index, net_delta) in [(tick_lower, amount as i128), (tick_upper, -(amount as i128))] {
            let mut tick = store
                .tick(pool, index)
                .unwrap_or_else(|| Tick::new(*pool, index, block));
            tick.liquidity_gross += amount;
            tick.liquidity_net += net_delta;
            store.put_tick(tick);
            self.refresh_tick(store, chain, gate, block, pool, index);
        }
    }

    /// Mirror of [`on_mint`](Self::on_mint) with the signs reversed.
    ///
    /// A burn against a tick that was never minted, or one that would push
    /// gross liquidity negative, means events arrived out of order or were
    /// decoded wrong; that is surfaced, not absorbed.
    #[allow(clippy::too_many_arguments)]
    pub fn on_burn<S, C>(
        &self,
        store: &mut S,
        chain: &C,
        gate: &CallGate,
        block: &BlockContext,
        pool: &Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(), StateError>
    where
        S: EntityStore,
        C: ChainStateAccessor,
    {
        // Load both boundaries before mutating either, so an integrity
        // fault leaves no half-applied burn behind.
        let mut lower = store.tick(pool, tick_lower).ok_or_else(|| {
            error!(pool = %pool, tick = tick_lower, "burn against missing tick");
            StateError::MissingTick { pool: *pool, tick: tick_lower }
        })?;
        let mut upper = store.tick(pool, tick_upper).ok_or_else(|| {
            error!(pool = %pool, tick = tick_upper, "burn against missing tick");
            StateError::MissingTick { pool: *pool, tick: tick_upper }
        })?;

        for tick in [&mut lower, &mut upper] {
            tick.liquidity_gross = tick.liquidity_gross.checked_sub(amount).ok_or(
                StateError::LiquidityUnderflow {
                    pool: *pool,
                    tick: tick.index,
                },
            )?;
        }
        lower.liquidity_net -= amount as i128;
        upper.liquidity_net += amount as i128;

        store.put_tick(lower);
        store.put_tick(upper);
        self.refresh_tick(store, chain, gate, block, pool, tick_lower);
        self.refresh_tick(store, chain, gate, block, pool, tick_upper);
        Ok(())
    }

    /// Refresh the fee growth of every initialized tick the price crossed
    /// moving from `old_tick` to `new_tick`.
    ///
    /// The crossed indices form an arithmetic sequence stepped by the
    /// pool's tick spacing; each qualifying index is refreshed exactly
    /// once, in walk order. When the jump exceeds `max_crossed_ticks`
    /// ticks the whole walk is skipped as a safety valve (the caller
    /// still persists the pool's new tick).
    #[allow(clippy::too_many_arguments)]
    pub fn on_swap<S, C>(
        &self,
        store: &mut S,
        chain: &C,
        gate: &CallGate,
        block: &BlockContext,
        pool: &Address,
        old_tick: i32,
        new_tick: i32,
        spacing: i32,
    ) where
        S: EntityStore,
        C: ChainStateAccessor,
    {
        let modulo = new_tick.rem_euclid(spacing);
        let distance = (i64::from(old_tick) - i64::from(new_tick)).abs() / i64::from(spacing);
        if distance > i64::from(self.max_crossed_ticks) {
            warn!(
                pool = %pool,
                old_tick,
                new_tick,
                distance,
                "tick jump exceeds crossing budget, skipping fee refresh for this swap"
            );
            return;
        }

        let mut indices: Vec<i32> = Vec::new();
        if new_tick > old_tick {
            let mut index = old_tick + (spacing - modulo);
            while index <= new_tick {
                indices.push(index);
                index += spacing;
            }
        } else if new_tick < old_tick {
            let mut index = old_tick - modulo;
            while index >= new_tick {
                indices.push(index);
                index -= spacing;
            }
        }
        // A spacing-aligned destination is itself an initialized tick and
        // must be refreshed even when the walk did not land on it.
        if modulo == 0 && !indices.contains(&new_tick) {
            indices.push(new_tick);
        }

        for index in indices {
            self.refresh_tick(store, chain, gate, block, pool, index);
        }
    }

    /// Re-read one tick's fee-growth-outside fields from chain state.
    /// Indices with no stored record are skipped (most are never
    /// initialized); an uninitialized on-chain tick keeps its stored
    /// values.
    fn refresh_tick<S, C>(
        &self,
        store: &mut S,
        chain: &C,
        gate: &CallGate,
        block: &BlockContext,
        pool: &Address,
        index: i32,
    ) where
        S: EntityStore,
        C: ChainStateAccessor,
    {
        if !gate.should_call(block.number) {
            return;
        }
        let Some(mut tick) = store.tick(pool, index) else {
            return;
        };
        match chain.tick_fee_growth(pool, index) {
            Some(growth) => {
                tick.fee_growth_outside0 = growth.fee_growth_outside0;
                tick.fee_growth_outside1 = growth.fee_growth_outside1;
                store.put_tick(tick);
            }
            None => {
                debug!(pool = %pool, index, "tick uninitialized on-chain, keeping stored fee growth");
            }
        }
    }
}
