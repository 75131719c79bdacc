//! Event dispatch and the handlers behind it.

mod pool;
mod position;

use crate::chain::{CallGate, ChainStateAccessor};
use crate::error::StateError;
use crate::pricing::{PriceOracle, PricingConfig};
use crate::store::EntityStore;
use crate::tick_ledger::TickLedger;
use crate::volume::VolumeAttributor;
use poolview_types::{Address, BlockContext, Event, Factory, Pool};
use rust_decimal::Decimal;
use tracing::debug;

/// The incremental state-update engine.
///
/// Owns the store and chain-accessor collaborators plus the pricing and
/// tick components, and routes each inbound event to the handlers that
/// care about its kind. Strictly single threaded; the host drives it one
/// event at a time in canonical order.
pub struct ViewEngine<S, C> {
    store: S,
    chain: C,
    gate: CallGate,
    ticks: TickLedger,
    oracle: PriceOracle,
    attributor: VolumeAttributor,
    factory: Address,
}

impl<S: EntityStore, C: ChainStateAccessor> ViewEngine<S, C> {
    /// Engine with the default gate, tick budget, and pricing constants.
    pub fn new(store: S, chain: C, factory: Address) -> Self {
        Self::with_config(
            store,
            chain,
            factory,
            CallGate::default(),
            TickLedger::default(),
            PricingConfig::default(),
        )
    }

    pub fn with_config(
        store: S,
        chain: C,
        factory: Address,
        gate: CallGate,
        ticks: TickLedger,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            store,
            chain,
            gate,
            ticks,
            oracle: PriceOracle::new(pricing.clone()),
            attributor: VolumeAttributor::new(pricing),
            factory,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Apply one event. Recoverable degradations (missing references,
    /// reverted calls) are absorbed with a log line; only data-integrity
    /// faults come back as errors.
    pub fn apply(&mut self, block: &BlockContext, event: Event) -> Result<(), StateError> {
        debug!(block = block.number, event = event.kind(), "applying event");
        match event {
            Event::PoolCreated { pool, token0, token1, fee } => {
                self.on_pool_created(block, pool, token0, token1, fee)
            }
            Event::Initialize { pool, sqrt_price, tick } => {
                self.on_initialize(pool, sqrt_price, tick)
            }
            Event::Mint { pool, tick_lower, tick_upper, amount, amount0, amount1, .. } => {
                self.on_mint(block, pool, tick_lower, tick_upper, amount, amount0, amount1)
            }
            Event::Burn { pool, tick_lower, tick_upper, amount, amount0, amount1 } => {
                self.on_burn(block, pool, tick_lower, tick_upper, amount, amount0, amount1)
            }
            Event::Swap { pool, amount0, amount1, sqrt_price, liquidity, tick } => {
                self.on_swap(block, pool, amount0, amount1, sqrt_price, liquidity, tick)
            }
            Event::Collect { pool, amount0, amount1 } => {
                self.on_collect(pool, amount0, amount1)
            }
            Event::Flash { pool } => self.on_flash(block, pool),
            Event::IncreaseLiquidity { position_id, liquidity, amount0, amount1 } => {
                self.on_increase_liquidity(block, position_id, liquidity, amount0, amount1)
            }
            Event::DecreaseLiquidity { position_id, liquidity, amount0, amount1 } => {
                self.on_decrease_liquidity(block, position_id, liquidity, amount0, amount1)
            }
            Event::CollectPosition { position_id, amount0, amount1 } => {
                self.on_collect_position(block, position_id, amount0, amount1)
            }
            Event::TransferPosition { position_id, to } => {
                self.on_transfer_position(block, position_id, to)
            }
        }
    }

    fn load_or_create_factory(&self) -> Factory {
        self.store
            .factory(&self.factory)
            .unwrap_or_else(|| Factory::new(self.factory))
    }

    fn eth_price_usd(&self) -> Decimal {
        self.store
            .bundle()
            .map(|bundle| bundle.eth_price_usd)
            .unwrap_or(Decimal::ZERO)
    }

    /// Re-derive the base-currency and USD value of a pool's locked
    /// tokens and fold the delta into the factory aggregates.
    fn sync_locked_value(
        &self,
        pool: &mut Pool,
        factory: &mut Factory,
        token0_derived_eth: Decimal,
        token1_derived_eth: Decimal,
    ) {
        let eth_price_usd = self.eth_price_usd();
        factory.total_value_locked_eth -= pool.total_value_locked_eth;
        pool.total_value_locked_eth = pool.total_value_locked_token0 * token0_derived_eth
            + pool.total_value_locked_token1 * token1_derived_eth;
        pool.total_value_locked_usd = pool.total_value_locked_eth * eth_price_usd;
        factory.total_value_locked_eth += pool.total_value_locked_eth;
        factory.total_value_locked_usd = factory.total_value_locked_eth * eth_price_usd;
    }

    /// Recompute both paired tokens' derived prices, each excluding the
    /// other as a reference.
    fn refresh_derived_eth(&mut self, token0_address: &Address, token1_address: &Address) {
        let (Some(mut token0), Some(mut token1)) = (
            self.store.token(token0_address),
            self.store.token(token1_address),
        ) else {
            return;
        };
        token0.derived_eth = self.oracle.derived_eth(&self.store, &token0, token1_address);
        token1.derived_eth = self.oracle.derived_eth(&self.store, &token1, token0_address);
        self.store.put_token(token0);
        self.store.put_token(token1);
    }
}
