//! Price derivation against scripted store contents.

mod common;

use common::{addr, block, pricing, BASE_TOKEN, ETH_REF_POOL, USD_REF_POOL, USD_TOKEN};
use poolview_state_market::{EntityStore, MemoryStore, PriceOracle};
use poolview_types::{Pool, Token};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn base_token() -> Token {
    let mut token = Token::new(addr(BASE_TOKEN), "WETH".into(), "Wrapped Ether".into(), 18);
    token.derived_eth = Decimal::ONE;
    token
}

fn pool_with(
    address: u8,
    token0: u8,
    token1: u8,
    liquidity: u128,
    tvl_token1: Decimal,
    token1_price: Decimal,
) -> Pool {
    let mut pool = Pool::new(addr(address), addr(token0), addr(token1), 3000, &block(1));
    pool.liquidity = liquidity;
    pool.total_value_locked_token1 = tvl_token1;
    pool.token1_price = token1_price;
    pool
}

#[test]
fn usd_rate_is_the_product_of_the_reference_pools() {
    let mut store = MemoryStore::default();
    let mut eth_ref = Pool::new(
        addr(ETH_REF_POOL),
        addr(BASE_TOKEN),
        addr(USD_TOKEN),
        3000,
        &block(1),
    );
    eth_ref.token0_price = dec!(2);
    let mut usd_ref = Pool::new(
        addr(USD_REF_POOL),
        addr(USD_TOKEN),
        addr(BASE_TOKEN),
        3000,
        &block(1),
    );
    usd_ref.token0_price = dec!(500);

    let oracle = PriceOracle::new(pricing());
    store.put_pool(eth_ref);
    assert_eq!(oracle.eth_price_usd(&store), Decimal::ZERO);

    store.put_pool(usd_ref);
    assert_eq!(oracle.eth_price_usd(&store), dec!(1000));
}

#[test]
fn base_token_is_always_one() {
    let store = MemoryStore::default();
    let oracle = PriceOracle::new(pricing());
    assert_eq!(
        oracle.derived_eth(&store, &base_token(), &addr(9)),
        Decimal::ONE
    );
}

#[test]
fn deepest_qualifying_pool_sets_the_price() {
    let mut store = MemoryStore::default();
    store.put_token(base_token());

    let mut token = Token::new(addr(3), "TKA".into(), "Token A".into(), 18);
    token.whitelist_pools = vec![addr(0x21), addr(0x22)];

    // shallow pool quotes 2, deep pool quotes 3
    store.put_pool(pool_with(0x21, 3, BASE_TOKEN, 1, dec!(5), dec!(2)));
    store.put_pool(pool_with(0x22, 3, BASE_TOKEN, 1, dec!(10), dec!(3)));

    let oracle = PriceOracle::new(pricing());
    assert_eq!(oracle.derived_eth(&store, &token, &addr(9)), dec!(3));
}

#[test]
fn pools_below_the_locked_floor_are_ignored() {
    let mut store = MemoryStore::default();
    store.put_token(base_token());

    let mut token = Token::new(addr(3), "TKA".into(), "Token A".into(), 18);
    token.whitelist_pools = vec![addr(0x21)];
    store.put_pool(pool_with(0x21, 3, BASE_TOKEN, 1, dec!(0.00005), dec!(2)));

    let oracle = PriceOracle::new(pricing());
    assert_eq!(oracle.derived_eth(&store, &token, &addr(9)), Decimal::ZERO);
}

#[test]
fn zero_liquidity_pools_are_ignored() {
    let mut store = MemoryStore::default();
    store.put_token(base_token());

    let mut token = Token::new(addr(3), "TKA".into(), "Token A".into(), 18);
    token.whitelist_pools = vec![addr(0x21)];
    store.put_pool(pool_with(0x21, 3, BASE_TOKEN, 0, dec!(10), dec!(2)));

    let oracle = PriceOracle::new(pricing());
    assert_eq!(oracle.derived_eth(&store, &token, &addr(9)), Decimal::ZERO);
}

#[test]
fn whitelisted_token_does_not_price_itself_off_its_own_counterparty() {
    let mut store = MemoryStore::default();
    store.put_token(base_token());

    // the stable is itself whitelisted, so the pool it currently trades
    // in is rejected as its own price source
    let mut stable = Token::new(addr(USD_TOKEN), "USDC".into(), "USD Coin".into(), 6);
    stable.whitelist_pools = vec![addr(0x21)];
    store.put_pool(pool_with(0x21, USD_TOKEN, BASE_TOKEN, 1, dec!(10), dec!(2)));

    let oracle = PriceOracle::new(pricing());
    assert_eq!(
        oracle.derived_eth(&store, &stable, &addr(BASE_TOKEN)),
        Decimal::ZERO
    );
    // against any other counterparty the same pool qualifies
    assert_eq!(oracle.derived_eth(&store, &stable, &addr(9)), dec!(2));
}
