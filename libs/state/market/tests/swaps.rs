//! End-to-end pool lifecycle through the engine dispatch.

mod common;

use common::{addr, block, engine, pricing, MockChain, BASE_TOKEN, ETH_REF_POOL, USD_REF_POOL};
use poolview_state_market::{
    CallGate, EntityStore, MemoryStore, PoolFeeGrowth, StateError, TickLedger, TokenMetadata,
    ViewEngine,
};
use poolview_types::{Event, Pool};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const POOL: u8 = 0x20;
const TKA: u8 = 3;

/// 2^96, the sqrt price encoding a 1:1 rate.
const UNIT_SQRT_PRICE: u128 = 79_228_162_514_264_337_593_543_950_336;

fn scripted_chain() -> MockChain {
    MockChain {
        token_metadata: [
            (
                addr(TKA),
                TokenMetadata {
                    symbol: "TKA".into(),
                    name: "Token A".into(),
                    decimals: 18,
                },
            ),
            (
                addr(BASE_TOKEN),
                TokenMetadata {
                    symbol: "WETH".into(),
                    name: "Wrapped Ether".into(),
                    decimals: 18,
                },
            ),
        ]
        .into(),
        pool_growth: [(
            addr(POOL),
            PoolFeeGrowth {
                fee_growth_global0: 123,
                fee_growth_global1: 456,
            },
        )]
        .into(),
        ..Default::default()
    }
}

/// Store pre-seeded with reference pools quoting a 1000 USD base rate.
fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::default();
    let mut eth_ref = Pool::new(addr(ETH_REF_POOL), addr(1), addr(2), 3000, &block(1));
    eth_ref.token0_price = dec!(2);
    let mut usd_ref = Pool::new(addr(USD_REF_POOL), addr(2), addr(1), 3000, &block(1));
    usd_ref.token0_price = dec!(500);
    store.put_pool(eth_ref);
    store.put_pool(usd_ref);
    store
}

fn created_and_initialized(chain: &MockChain) -> ViewEngine<MemoryStore, &MockChain> {
    let mut engine = engine(seeded_store(), chain);
    engine
        .apply(
            &block(100),
            Event::PoolCreated {
                pool: addr(POOL),
                token0: addr(TKA),
                token1: addr(BASE_TOKEN),
                fee: 3000,
            },
        )
        .unwrap();
    engine
        .apply(
            &block(101),
            Event::Initialize {
                pool: addr(POOL),
                sqrt_price: UNIT_SQRT_PRICE,
                tick: 0,
            },
        )
        .unwrap();
    engine
}

#[test]
fn pool_creation_registers_whitelist_pools() {
    let chain = scripted_chain();
    let engine = created_and_initialized(&chain);
    let store = engine.store();

    // the base side is whitelisted, so this pool prices the other side
    let tka = store.token(&addr(TKA)).unwrap();
    assert_eq!(tka.whitelist_pools, vec![addr(POOL)]);
    assert_eq!(tka.decimals, 18);
    let weth = store.token(&addr(BASE_TOKEN)).unwrap();
    assert!(weth.whitelist_pools.is_empty());

    let pool = store.pool(&addr(POOL)).unwrap();
    assert_eq!(pool.tick, Some(0));
    assert_eq!(pool.sqrt_price, UNIT_SQRT_PRICE);
    assert_eq!(store.bundle().unwrap().eth_price_usd, dec!(1000));
    // derived prices after initialize: base is 1, the empty pool prices
    // its counterpart at 0
    assert_eq!(weth.derived_eth, Decimal::ONE);
    assert_eq!(tka.derived_eth, Decimal::ZERO);
}

#[test]
fn in_range_mint_moves_liquidity_and_locked_value() {
    let chain = scripted_chain();
    let mut engine = created_and_initialized(&chain);
    engine
        .apply(
            &block(102),
            Event::Mint {
                pool: addr(POOL),
                owner: addr(7),
                tick_lower: -60,
                tick_upper: 60,
                amount: 1_000,
                amount0: 5_000_000_000_000_000_000,
                amount1: 5_000_000_000_000_000_000,
            },
        )
        .unwrap();

    let store = engine.store();
    let pool = store.pool(&addr(POOL)).unwrap();
    assert_eq!(pool.liquidity, 1_000);
    assert_eq!(pool.total_value_locked_token0, dec!(5));
    assert_eq!(pool.total_value_locked_token1, dec!(5));
    // only the base side carries a derived price so far
    assert_eq!(pool.total_value_locked_eth, dec!(5));
    assert_eq!(pool.total_value_locked_usd, dec!(5000));

    assert_eq!(store.tick(&addr(POOL), -60).unwrap().liquidity_net, 1_000);
    assert_eq!(store.tick(&addr(POOL), 60).unwrap().liquidity_net, -1_000);

    // a second mint entirely above the active tick adds no in-range liquidity
    engine
        .apply(
            &block(103),
            Event::Mint {
                pool: addr(POOL),
                owner: addr(7),
                tick_lower: 60,
                tick_upper: 120,
                amount: 9_999,
                amount0: 1_000_000_000_000_000_000,
                amount1: 0,
            },
        )
        .unwrap();
    assert_eq!(engine.store().pool(&addr(POOL)).unwrap().liquidity, 1_000);
}

#[test]
fn swap_attributes_volume_and_reprices_the_pool() {
    let chain = scripted_chain();
    let mut engine = created_and_initialized(&chain);
    engine
        .apply(
            &block(102),
            Event::Mint {
                pool: addr(POOL),
                owner: addr(7),
                tick_lower: -60,
                tick_upper: 60,
                amount: 1_000,
                amount0: 5_000_000_000_000_000_000,
                amount1: 5_000_000_000_000_000_000,
            },
        )
        .unwrap();

    // 1 TKA in, 0.9 WETH out, price unchanged
    engine
        .apply(
            &block(103),
            Event::Swap {
                pool: addr(POOL),
                amount0: 1_000_000_000_000_000_000,
                amount1: -900_000_000_000_000_000,
                sqrt_price: UNIT_SQRT_PRICE,
                liquidity: 1_000,
                tick: 0,
            },
        )
        .unwrap();

    let store = engine.store();
    let pool = store.pool(&addr(POOL)).unwrap();
    assert_eq!(pool.volume_token0, dec!(1));
    assert_eq!(pool.volume_token1, dec!(0.9));
    // one whitelisted side: tracked is twice that side, then halved per trade
    assert_eq!(pool.volume_usd, dec!(900));
    // untracked: the plain mean of both sides' USD value
    assert_eq!(pool.untracked_volume_usd, dec!(450));
    assert_eq!(pool.fees_usd, dec!(2.7));
    assert_eq!(pool.total_value_locked_token0, dec!(6));
    assert_eq!(pool.total_value_locked_token1, dec!(4.1));
    assert_eq!(pool.token0_price, Decimal::ONE);
    assert_eq!(pool.token1_price, Decimal::ONE);
    // the swap left real liquidity behind, so TKA now prices off this pool
    let tka = store.token(&addr(TKA)).unwrap();
    assert_eq!(tka.derived_eth, Decimal::ONE);
    assert_eq!(tka.total_value_locked_usd, dec!(6000));
    assert_eq!(pool.total_value_locked_eth, dec!(10.1));
    assert_eq!(pool.total_value_locked_usd, dec!(10100));
    // global fee growth re-read from chain state
    assert_eq!(pool.fee_growth_global0, 123);
    assert_eq!(pool.fee_growth_global1, 456);

    let factory = store.factory(&addr(common::FACTORY)).unwrap();
    assert_eq!(factory.pool_count, 1);
    assert_eq!(factory.tx_count, 3);
    assert_eq!(factory.total_volume_usd, dec!(900));
    assert_eq!(factory.total_volume_eth, dec!(0.9));
    assert_eq!(factory.total_fees_usd, dec!(2.7));
}

#[test]
fn collect_books_fees_and_releases_locked_value() {
    let chain = scripted_chain();
    let mut engine = created_and_initialized(&chain);
    engine
        .apply(
            &block(102),
            Event::Mint {
                pool: addr(POOL),
                owner: addr(7),
                tick_lower: -60,
                tick_upper: 60,
                amount: 1_000,
                amount0: 5_000_000_000_000_000_000,
                amount1: 5_000_000_000_000_000_000,
            },
        )
        .unwrap();
    engine
        .apply(
            &block(103),
            Event::Collect {
                pool: addr(POOL),
                amount0: 100_000_000_000_000_000,
                amount1: 200_000_000_000_000_000,
            },
        )
        .unwrap();

    let pool = engine.store().pool(&addr(POOL)).unwrap();
    assert_eq!(pool.collected_fees_token0, dec!(0.1));
    assert_eq!(pool.collected_fees_token1, dec!(0.2));
    // collection is not a trade; tracked value is not halved
    assert_eq!(pool.collected_fees_usd, dec!(400));
    assert_eq!(pool.total_value_locked_token0, dec!(4.9));
    assert_eq!(pool.total_value_locked_token1, dec!(4.8));
}

#[test]
fn flash_refreshes_global_fee_growth_only() {
    let chain = scripted_chain();
    let mut engine = created_and_initialized(&chain);
    engine
        .apply(&block(102), Event::Flash { pool: addr(POOL) })
        .unwrap();

    let pool = engine.store().pool(&addr(POOL)).unwrap();
    assert_eq!(pool.fee_growth_global0, 123);
    assert_eq!(pool.fee_growth_global1, 456);
    assert_eq!(pool.volume_usd, Decimal::ZERO);
}

#[test]
fn swap_on_unknown_fee_tier_is_an_error() {
    let mut chain = scripted_chain();
    chain.pool_growth.clear();
    let mut engine = engine(seeded_store(), &chain);
    engine
        .apply(
            &block(100),
            Event::PoolCreated {
                pool: addr(POOL),
                token0: addr(TKA),
                token1: addr(BASE_TOKEN),
                fee: 1234,
            },
        )
        .unwrap();
    engine
        .apply(
            &block(101),
            Event::Initialize {
                pool: addr(POOL),
                sqrt_price: UNIT_SQRT_PRICE,
                tick: 0,
            },
        )
        .unwrap();

    let err = engine
        .apply(
            &block(102),
            Event::Swap {
                pool: addr(POOL),
                amount0: 1,
                amount1: -1,
                sqrt_price: UNIT_SQRT_PRICE,
                liquidity: 1,
                tick: 0,
            },
        )
        .unwrap_err();
    assert_eq!(
        err,
        StateError::UnknownFeeTier {
            pool: addr(POOL),
            fee: 1234
        }
    );
}

#[test]
fn burn_against_unminted_range_surfaces_the_integrity_error() {
    let chain = scripted_chain();
    let mut engine = created_and_initialized(&chain);
    let err = engine
        .apply(
            &block(102),
            Event::Burn {
                pool: addr(POOL),
                tick_lower: -120,
                tick_upper: 120,
                amount: 5,
                amount0: 0,
                amount1: 0,
            },
        )
        .unwrap_err();
    assert!(matches!(err, StateError::MissingTick { tick: -120, .. }));
}

#[test]
fn gated_heights_create_sentinel_tokens_without_chain_calls() {
    let chain = scripted_chain();
    let mut engine = ViewEngine::with_config(
        MemoryStore::default(),
        &chain,
        addr(common::FACTORY),
        CallGate::default(),
        TickLedger::default(),
        pricing(),
    );
    // far below the checkpoint: metadata must not be fetched
    engine
        .apply(
            &block(100),
            Event::PoolCreated {
                pool: addr(POOL),
                token0: addr(TKA),
                token1: addr(BASE_TOKEN),
                fee: 3000,
            },
        )
        .unwrap();

    assert_eq!(chain.calls.get(), 0);
    let store = engine.store();
    assert_eq!(store.pool_count(), 1);
    let tka = store.token(&addr(TKA)).unwrap();
    assert_eq!(tka.symbol, "unknown");
    assert_eq!(tka.decimals, 0);
}
