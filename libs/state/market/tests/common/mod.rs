#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use poolview_state_market::{
    CallGate, ChainStateAccessor, MemoryStore, PoolFeeGrowth, PositionParams, PricingConfig,
    TickFeeGrowth, TickLedger, TokenMetadata, ViewEngine,
};
use poolview_types::{Address, BlockContext};
use rust_decimal_macros::dec;

/// Scripted chain accessor. Responses come from the maps; every query is
/// counted so tests can assert how many calls a code path issued.
#[derive(Debug, Default)]
pub struct MockChain {
    pub tick_growth: BTreeMap<(Address, i32), TickFeeGrowth>,
    pub position_params: BTreeMap<u64, PositionParams>,
    pub pairs: BTreeMap<(Address, Address, u32), Address>,
    pub pool_growth: BTreeMap<Address, PoolFeeGrowth>,
    pub token_metadata: BTreeMap<Address, TokenMetadata>,
    pub tick_queries: RefCell<Vec<(Address, i32)>>,
    pub calls: Cell<u64>,
}

// The engine owns its accessor; implementing the seam on a shared
// reference lets tests keep inspecting the mock afterwards.
impl ChainStateAccessor for &MockChain {
    fn tick_fee_growth(&self, pool: &Address, tick_index: i32) -> Option<TickFeeGrowth> {
        self.calls.set(self.calls.get() + 1);
        self.tick_queries.borrow_mut().push((*pool, tick_index));
        self.tick_growth.get(&(*pool, tick_index)).copied()
    }

    fn position_params(&self, position_id: u64) -> Option<PositionParams> {
        self.calls.set(self.calls.get() + 1);
        self.position_params.get(&position_id).cloned()
    }

    fn pool_for_pair(&self, token0: &Address, token1: &Address, fee: u32) -> Option<Address> {
        self.calls.set(self.calls.get() + 1);
        self.pairs.get(&(*token0, *token1, fee)).copied()
    }

    fn pool_fee_growth(&self, pool: &Address) -> Option<PoolFeeGrowth> {
        self.calls.set(self.calls.get() + 1);
        self.pool_growth.get(pool).copied()
    }

    fn token_metadata(&self, token: &Address) -> Option<TokenMetadata> {
        self.calls.set(self.calls.get() + 1);
        self.token_metadata.get(token).cloned()
    }
}

pub fn addr(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = n;
    Address::new(bytes)
}

pub fn block(number: u64) -> BlockContext {
    BlockContext {
        number,
        timestamp: 1_700_000_000 + number,
    }
}

pub const FACTORY: u8 = 0xfa;
pub const BASE_TOKEN: u8 = 1;
pub const USD_TOKEN: u8 = 2;
pub const ETH_REF_POOL: u8 = 0x10;
pub const USD_REF_POOL: u8 = 0x11;

/// Small deployment stand-in: one base token, one whitelisted stable,
/// and the two reference pools.
pub fn pricing() -> PricingConfig {
    PricingConfig {
        base_token: addr(BASE_TOKEN),
        whitelist_tokens: vec![addr(BASE_TOKEN), addr(USD_TOKEN)],
        eth_reference_pool: addr(ETH_REF_POOL),
        usd_reference_pool: addr(USD_REF_POOL),
        minimum_eth_locked: dec!(0.0001),
    }
}

/// Engine over a pre-seeded store with the gate fully open.
pub fn engine(store: MemoryStore, chain: &MockChain) -> ViewEngine<MemoryStore, &MockChain> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    ViewEngine::with_config(
        store,
        chain,
        addr(FACTORY),
        CallGate::new(0),
        TickLedger::default(),
        pricing(),
    )
}
