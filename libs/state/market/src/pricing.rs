//! Price derivation from pool reserve ratios.
//!
//! No external price feed exists; a token's value in the base currency is
//! estimated by walking its whitelist pools and trusting the single
//! deepest one, and the base-currency/USD rate comes from two designated
//! stable pools. Thin pools are excluded by a minimum-locked floor.

use crate::store::EntityStore;
use poolview_types::{Address, Token};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// Deployment constants of the tracked network.
const WEVMOS: Address = Address::new([
    0xd4, 0x94, 0x96, 0x64, 0xcd, 0x82, 0x66, 0x0a, 0xae, 0x99,
    0xbe, 0xdc, 0x03, 0x4a, 0x0d, 0xea, 0x8a, 0x0b, 0xd5, 0x17,
]);
// axlWETH, the base token every price is derived against
const AXL_WETH: Address = Address::new([
    0x50, 0xde, 0x24, 0xb3, 0xf0, 0xb3, 0x13, 0x6c, 0x50, 0xfa,
    0x8a, 0x3b, 0x8e, 0xbc, 0x8b, 0xd8, 0x0a, 0x26, 0x9c, 0xe5,
]);
const ST_EVMOS: Address = Address::new([
    0x2c, 0x68, 0xd1, 0xd6, 0xab, 0x98, 0x6f, 0xf4, 0x64, 0x0b,
    0x51, 0xe1, 0xf1, 0x4c, 0x71, 0x6a, 0x07, 0x6e, 0x44, 0xc4,
]);
const ATOM: Address = Address::new([
    0xc5, 0xe0, 0x0d, 0x3b, 0x04, 0x56, 0x39, 0x50, 0x94, 0x1f,
    0x71, 0x37, 0xb5, 0xaf, 0xa3, 0xa5, 0x34, 0xf0, 0xd6, 0xd6,
]);
const USDC_CELER: Address = Address::new([
    0xe4, 0x69, 0x10, 0x33, 0x64, 0x79, 0xf2, 0x54, 0x72, 0x37,
    0x10, 0xd5, 0x7e, 0x7b, 0x68, 0x3f, 0x33, 0x15, 0xb2, 0x2b,
]);
const USDC_AXELAR: Address = Address::new([
    0x15, 0xc3, 0xeb, 0x3b, 0x62, 0x1d, 0x1b, 0xff, 0x62, 0xcb,
    0xa1, 0xc9, 0x53, 0x6b, 0x7c, 0x1a, 0xe9, 0x14, 0x9b, 0x57,
]);
// stEVMOS/axlWETH 0.3%
const ST_EVMOS_WETH_POOL: Address = Address::new([
    0x00, 0x86, 0xe8, 0x7f, 0xdb, 0xfd, 0xbf, 0xf4, 0xbb, 0xaf,
    0xdf, 0x6f, 0x57, 0x7b, 0x5a, 0xaf, 0x15, 0xd0, 0x22, 0x8e,
]);
// axlUSDC/stEVMOS 0.3%
const USDC_ST_EVMOS_POOL: Address = Address::new([
    0xd0, 0x22, 0x69, 0xb6, 0x12, 0xf3, 0xbd, 0x17, 0xcd, 0xb3,
    0xc7, 0xdd, 0xa7, 0x5e, 0xc0, 0x7a, 0xea, 0xb8, 0x68, 0xed,
]);

/// Pricing reference constants. Defaults match the deployment this view
/// was built for; tests and other deployments inject their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// The base-currency token; its derived price is exactly 1.
    pub base_token: Address,
    /// Tokens trusted as pricing references. Amounts in these tokens
    /// count toward tracked volume and liquidity.
    pub whitelist_tokens: Vec<Address>,
    /// High-liquidity pool pairing the base token with the native token.
    pub eth_reference_pool: Address,
    /// High-liquidity pool pairing a stablecoin with the native token.
    pub usd_reference_pool: Address,
    /// Reference pools locking less base-currency value than this are
    /// ignored as price sources.
    pub minimum_eth_locked: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_token: AXL_WETH,
            whitelist_tokens: vec![
                WEVMOS, AXL_WETH, ST_EVMOS, ATOM, USDC_CELER, USDC_AXELAR,
            ],
            eth_reference_pool: ST_EVMOS_WETH_POOL,
            usd_reference_pool: USDC_ST_EVMOS_POOL,
            minimum_eth_locked: dec!(0.001),
        }
    }
}

/// Derives token prices in the base currency and the base-currency/USD
/// rate from pool reserve ratios.
#[derive(Debug, Clone, Default)]
pub struct PriceOracle {
    pub config: PricingConfig,
}

impl PriceOracle {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn is_whitelisted(&self, token: &Address) -> bool {
        self.config.whitelist_tokens.contains(token)
    }

    /// Base-currency price in USD: the product of the two reference
    /// pools' `token0_price`. Zero while either pool is missing, so the
    /// rate degrades instead of failing before both exist.
    pub fn eth_price_usd<S: EntityStore>(&self, store: &S) -> Decimal {
        match (
            store.pool(&self.config.eth_reference_pool),
            store.pool(&self.config.usd_reference_pool),
        ) {
            (Some(eth_pool), Some(usd_pool)) => {
                eth_pool.token0_price * usd_pool.token0_price
            }
            _ => Decimal::ZERO,
        }
    }

    /// A token's price in the base currency.
    ///
    /// The base token itself is exactly 1. Every other token scans its
    /// whitelist pools and takes the spot rate from the single candidate
    /// with the most base-currency value locked on the reference side,
    /// subject to the minimum-locked floor. `other_token` is the token it
    /// currently trades against; a reference side equal to it is skipped
    /// unless the scanned side is itself whitelisted, which dampens
    /// self-referential pricing loops. Zero when nothing qualifies.
    pub fn derived_eth<S: EntityStore>(
        &self,
        store: &S,
        token: &Token,
        other_token: &Address,
    ) -> Decimal {
        if token.address == self.config.base_token {
            return Decimal::ONE;
        }

        let mut largest_eth_locked = Decimal::ZERO;
        let mut price_so_far = Decimal::ZERO;

        for pool_address in &token.whitelist_pools {
            let Some(pool) = store.pool(pool_address) else {
                continue;
            };
            if pool.liquidity == 0 {
                continue;
            }

            if pool.token0 == token.address
                && (pool.token1 != *other_token || !self.is_whitelisted(&pool.token0))
            {
                if let Some(reference) = store.token(&pool.token1) {
                    let eth_locked =
                        pool.total_value_locked_token1 * reference.derived_eth;
                    if eth_locked > largest_eth_locked
                        && eth_locked > self.config.minimum_eth_locked
                    {
                        largest_eth_locked = eth_locked;
                        // reference per our token, times base per reference
                        price_so_far = pool.token1_price * reference.derived_eth;
                    }
                }
            }
            if pool.token1 == token.address
                && (pool.token0 != *other_token || !self.is_whitelisted(&pool.token1))
            {
                if let Some(reference) = store.token(&pool.token0) {
                    let eth_locked =
                        pool.total_value_locked_token0 * reference.derived_eth;
                    if eth_locked > largest_eth_locked
                        && eth_locked > self.config.minimum_eth_locked
                    {
                        largest_eth_locked = eth_locked;
                        price_so_far = pool.token0_price * reference.derived_eth;
                    }
                }
            }
        }

        price_so_far
    }
}
