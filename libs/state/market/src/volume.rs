//! USD attribution for two-sided trade amounts.

use crate::pricing::PricingConfig;
use crate::store::EntityStore;
use poolview_types::Token;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decides how much of a trade's value is trustworthy enough to count
/// toward tracked USD volume and liquidity. Only whitelisted tokens have
/// reliable derived prices.
#[derive(Debug, Clone, Default)]
pub struct VolumeAttributor {
    pub config: PricingConfig,
}

impl VolumeAttributor {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Tracked USD value of a (amount0, amount1) pair:
    /// both sides whitelisted, the sum of both USD values; one side,
    /// twice that side (the pool is assumed balanced in value); neither,
    /// zero.
    pub fn tracked_amount_usd<S: EntityStore>(
        &self,
        store: &S,
        amount0: Decimal,
        token0: &Token,
        amount1: Decimal,
        token1: &Token,
    ) -> Decimal {
        let eth_price_usd = store
            .bundle()
            .map(|bundle| bundle.eth_price_usd)
            .unwrap_or(Decimal::ZERO);
        let price0_usd = token0.derived_eth * eth_price_usd;
        let price1_usd = token1.derived_eth * eth_price_usd;

        let whitelisted0 = self.config.whitelist_tokens.contains(&token0.address);
        let whitelisted1 = self.config.whitelist_tokens.contains(&token1.address);

        match (whitelisted0, whitelisted1) {
            (true, true) => amount0 * price0_usd + amount1 * price1_usd,
            (true, false) => amount0 * price0_usd * dec!(2),
            (false, true) => amount1 * price1_usd * dec!(2),
            (false, false) => Decimal::ZERO,
        }
    }
}
