//! Factory and pool event handlers.

use super::ViewEngine;
use crate::chain::ChainStateAccessor;
use crate::error::StateError;
use crate::store::EntityStore;
use poolview_amm::{
    convert_signed_token_to_decimal, convert_token_to_decimal, fee_tier_to_tick_spacing,
    safe_div, sqrt_price_x96_to_token_prices,
};
use poolview_types::{Address, BlockContext, Pool, Token};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};

impl<S: EntityStore, C: ChainStateAccessor> ViewEngine<S, C> {
    pub(super) fn on_pool_created(
        &mut self,
        block: &BlockContext,
        pool_address: Address,
        token0_address: Address,
        token1_address: Address,
        fee: u32,
    ) -> Result<(), StateError> {
        let mut factory = self.load_or_create_factory();
        factory.pool_count += 1;
        factory.tx_count += 1;

        let mut token0 = self.load_or_create_token(block, &token0_address);
        let mut token1 = self.load_or_create_token(block, &token1_address);

        // a pool against a whitelisted counterparty becomes a pricing
        // candidate for the other side
        if self.oracle.is_whitelisted(&token0_address) {
            token1.whitelist_pools.push(pool_address);
        }
        if self.oracle.is_whitelisted(&token1_address) {
            token0.whitelist_pools.push(pool_address);
        }

        info!(pool = %pool_address, fee, "pool created");
        self.store.put_token(token0);
        self.store.put_token(token1);
        self.store
            .put_pool(Pool::new(pool_address, token0_address, token1_address, fee, block));
        self.store.put_factory(factory);
        Ok(())
    }

    pub(super) fn on_initialize(
        &mut self,
        pool_address: Address,
        sqrt_price: u128,
        tick: i32,
    ) -> Result<(), StateError> {
        let Some(mut pool) = self.store.pool(&pool_address) else {
            debug!(pool = %pool_address, "initialize for unknown pool, skipping");
            return Ok(());
        };
        pool.sqrt_price = sqrt_price;
        pool.tick = Some(tick);
        if let (Some(token0), Some(token1)) = (
            self.store.token(&pool.token0),
            self.store.token(&pool.token1),
        ) {
            let (price0, price1) =
                sqrt_price_x96_to_token_prices(sqrt_price, token0.decimals, token1.decimals);
            pool.token0_price = price0;
            pool.token1_price = price1;
        }
        let (token0_address, token1_address) = (pool.token0, pool.token1);
        self.store.put_pool(pool);

        let mut bundle = self.store.bundle().unwrap_or_default();
        bundle.eth_price_usd = self.oracle.eth_price_usd(&self.store);
        self.store.put_bundle(bundle);

        self.refresh_derived_eth(&token0_address, &token1_address);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn on_mint(
        &mut self,
        block: &BlockContext,
        pool_address: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
        amount0_raw: u128,
        amount1_raw: u128,
    ) -> Result<(), StateError> {
        let Some(mut pool) = self.store.pool(&pool_address) else {
            debug!(pool = %pool_address, "mint for unknown pool, skipping");
            return Ok(());
        };
        let (Some(mut token0), Some(mut token1)) = (
            self.store.token(&pool.token0),
            self.store.token(&pool.token1),
        ) else {
            debug!(pool = %pool_address, "mint with unindexed tokens, skipping");
            return Ok(());
        };
        let mut factory = self.load_or_create_factory();
        let eth_price_usd = self.eth_price_usd();

        let amount0 = convert_token_to_decimal(amount0_raw, token0.decimals);
        let amount1 = convert_token_to_decimal(amount1_raw, token1.decimals);

        token0.tx_count += 1;
        token0.total_value_locked += amount0;
        token0.total_value_locked_usd =
            token0.total_value_locked * token0.derived_eth * eth_price_usd;
        token1.tx_count += 1;
        token1.total_value_locked += amount1;
        token1.total_value_locked_usd =
            token1.total_value_locked * token1.derived_eth * eth_price_usd;

        // only liquidity whose range spans the active tick is in range
        if let Some(current) = pool.tick {
            if tick_lower <= current && current < tick_upper {
                pool.liquidity += amount;
            }
        }
        pool.total_value_locked_token0 += amount0;
        pool.total_value_locked_token1 += amount1;
        pool.tx_count += 1;
        factory.tx_count += 1;

        self.sync_locked_value(&mut pool, &mut factory, token0.derived_eth, token1.derived_eth);

        self.store.put_pool(pool);
        self.store.put_token(token0);
        self.store.put_token(token1);
        self.store.put_factory(factory);

        let ticks = self.ticks;
        ticks.on_mint(
            &mut self.store,
            &self.chain,
            &self.gate,
            block,
            &pool_address,
            tick_lower,
            tick_upper,
            amount,
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn on_burn(
        &mut self,
        block: &BlockContext,
        pool_address: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
        amount0_raw: u128,
        amount1_raw: u128,
    ) -> Result<(), StateError> {
        let Some(mut pool) = self.store.pool(&pool_address) else {
            debug!(pool = %pool_address, "burn for unknown pool, skipping");
            return Ok(());
        };
        let (Some(mut token0), Some(mut token1)) = (
            self.store.token(&pool.token0),
            self.store.token(&pool.token1),
        ) else {
            debug!(pool = %pool_address, "burn with unindexed tokens, skipping");
            return Ok(());
        };
        let mut factory = self.load_or_create_factory();
        let eth_price_usd = self.eth_price_usd();

        let amount0 = convert_token_to_decimal(amount0_raw, token0.decimals);
        let amount1 = convert_token_to_decimal(amount1_raw, token1.decimals);

        token0.tx_count += 1;
        token0.total_value_locked -= amount0;
        token0.total_value_locked_usd =
            token0.total_value_locked * token0.derived_eth * eth_price_usd;
        token1.tx_count += 1;
        token1.total_value_locked -= amount1;
        token1.total_value_locked_usd =
            token1.total_value_locked * token1.derived_eth * eth_price_usd;

        if let Some(current) = pool.tick {
            if tick_lower <= current && current < tick_upper {
                pool.liquidity = pool.liquidity.saturating_sub(amount);
            }
        }
        pool.total_value_locked_token0 -= amount0;
        pool.total_value_locked_token1 -= amount1;
        pool.tx_count += 1;
        factory.tx_count += 1;

        self.sync_locked_value(&mut pool, &mut factory, token0.derived_eth, token1.derived_eth);

        self.store.put_pool(pool);
        self.store.put_token(token0);
        self.store.put_token(token1);
        self.store.put_factory(factory);

        let ticks = self.ticks;
        ticks.on_burn(
            &mut self.store,
            &self.chain,
            &self.gate,
            block,
            &pool_address,
            tick_lower,
            tick_upper,
            amount,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn on_swap(
        &mut self,
        block: &BlockContext,
        pool_address: Address,
        amount0_raw: i128,
        amount1_raw: i128,
        sqrt_price: u128,
        liquidity: u128,
        tick: i32,
    ) -> Result<(), StateError> {
        let Some(mut pool) = self.store.pool(&pool_address) else {
            debug!(pool = %pool_address, "swap for unknown pool, skipping");
            return Ok(());
        };
        let Some(old_tick) = pool.tick else {
            warn!(pool = %pool_address, "swap before initialize, skipping");
            return Ok(());
        };
        let (Some(mut token0), Some(mut token1)) = (
            self.store.token(&pool.token0),
            self.store.token(&pool.token1),
        ) else {
            debug!(pool = %pool_address, "swap with unindexed tokens, skipping");
            return Ok(());
        };
        let spacing = fee_tier_to_tick_spacing(pool.fee_tier).ok_or(
            StateError::UnknownFeeTier {
                pool: pool_address,
                fee: pool.fee_tier,
            },
        )?;
        let mut factory = self.load_or_create_factory();

        let amount0 = convert_signed_token_to_decimal(amount0_raw, token0.decimals);
        let amount1 = convert_signed_token_to_decimal(amount1_raw, token1.decimals);
        let amount0_abs = amount0.abs();
        let amount1_abs = amount1.abs();

        let eth_price_usd = self.eth_price_usd();
        let amount0_usd = amount0_abs * token0.derived_eth * eth_price_usd;
        let amount1_usd = amount1_abs * token1.derived_eth * eth_price_usd;
        // one trade touches both sides; halve so totals are not counted twice
        let amount_usd_untracked = (amount0_usd + amount1_usd) / dec!(2);
        let amount_usd_tracked = self
            .attributor
            .tracked_amount_usd(&self.store, amount0_abs, &token0, amount1_abs, &token1)
            / dec!(2);
        let amount_eth_tracked = safe_div(amount_usd_tracked, eth_price_usd);

        let fee_rate = Decimal::from(pool.fee_tier) / dec!(1000000);
        let fees_eth = amount_eth_tracked * fee_rate;
        let fees_usd = amount_usd_tracked * fee_rate;

        factory.tx_count += 1;
        factory.total_volume_eth += amount_eth_tracked;
        factory.total_volume_usd += amount_usd_tracked;
        factory.untracked_volume_usd += amount_usd_untracked;
        factory.total_fees_eth += fees_eth;
        factory.total_fees_usd += fees_usd;

        pool.volume_token0 += amount0_abs;
        pool.volume_token1 += amount1_abs;
        pool.volume_usd += amount_usd_tracked;
        pool.untracked_volume_usd += amount_usd_untracked;
        pool.fees_usd += fees_usd;
        pool.tx_count += 1;
        pool.liquidity = liquidity;
        pool.sqrt_price = sqrt_price;
        pool.total_value_locked_token0 += amount0;
        pool.total_value_locked_token1 += amount1;

        token0.volume += amount0_abs;
        token0.volume_usd += amount_usd_tracked;
        token0.untracked_volume_usd += amount_usd_untracked;
        token0.fees_usd += fees_usd;
        token0.tx_count += 1;
        token0.total_value_locked += amount0;
        token1.volume += amount1_abs;
        token1.volume_usd += amount_usd_tracked;
        token1.untracked_volume_usd += amount_usd_untracked;
        token1.fees_usd += fees_usd;
        token1.tx_count += 1;
        token1.total_value_locked += amount1;

        // walk the crossed ticks against the previously stored tick,
        // before the pool record moves to the new one
        let ticks = self.ticks;
        ticks.on_swap(
            &mut self.store,
            &self.chain,
            &self.gate,
            block,
            &pool_address,
            old_tick,
            tick,
            spacing,
        );
        pool.tick = Some(tick);

        let (price0, price1) =
            sqrt_price_x96_to_token_prices(sqrt_price, token0.decimals, token1.decimals);
        pool.token0_price = price0;
        pool.token1_price = price1;
        // save before the USD rate refresh: this pool may itself be one of
        // the oracle's reference pools
        self.store.put_pool(pool.clone());

        let mut bundle = self.store.bundle().unwrap_or_default();
        bundle.eth_price_usd = self.oracle.eth_price_usd(&self.store);
        let eth_price_usd = bundle.eth_price_usd;
        self.store.put_bundle(bundle);

        token0.derived_eth = self.oracle.derived_eth(&self.store, &token0, &token1.address);
        token1.derived_eth = self.oracle.derived_eth(&self.store, &token1, &token0.address);
        token0.total_value_locked_usd =
            token0.total_value_locked * token0.derived_eth * eth_price_usd;
        token1.total_value_locked_usd =
            token1.total_value_locked * token1.derived_eth * eth_price_usd;

        self.sync_locked_value(&mut pool, &mut factory, token0.derived_eth, token1.derived_eth);

        // fee-growth accumulators are not derivable from the event stream
        if self.gate.should_call(block.number) {
            if let Some(growth) = self.chain.pool_fee_growth(&pool_address) {
                pool.fee_growth_global0 = growth.fee_growth_global0;
                pool.fee_growth_global1 = growth.fee_growth_global1;
            }
        }

        self.store.put_pool(pool);
        self.store.put_token(token0);
        self.store.put_token(token1);
        self.store.put_factory(factory);
        Ok(())
    }

    pub(super) fn on_collect(
        &mut self,
        pool_address: Address,
        amount0_raw: u128,
        amount1_raw: u128,
    ) -> Result<(), StateError> {
        let Some(mut pool) = self.store.pool(&pool_address) else {
            debug!(pool = %pool_address, "collect for unknown pool, skipping");
            return Ok(());
        };
        let (Some(mut token0), Some(mut token1)) = (
            self.store.token(&pool.token0),
            self.store.token(&pool.token1),
        ) else {
            debug!(pool = %pool_address, "collect with unindexed tokens, skipping");
            return Ok(());
        };
        let mut factory = self.load_or_create_factory();
        let eth_price_usd = self.eth_price_usd();

        let amount0 = convert_token_to_decimal(amount0_raw, token0.decimals);
        let amount1 = convert_token_to_decimal(amount1_raw, token1.decimals);
        let collected_usd =
            self.attributor
                .tracked_amount_usd(&self.store, amount0, &token0, amount1, &token1);

        pool.collected_fees_token0 += amount0;
        pool.collected_fees_token1 += amount1;
        pool.collected_fees_usd += collected_usd;
        pool.total_value_locked_token0 -= amount0;
        pool.total_value_locked_token1 -= amount1;
        pool.tx_count += 1;
        factory.tx_count += 1;

        token0.tx_count += 1;
        token0.total_value_locked -= amount0;
        token0.total_value_locked_usd =
            token0.total_value_locked * token0.derived_eth * eth_price_usd;
        token1.tx_count += 1;
        token1.total_value_locked -= amount1;
        token1.total_value_locked_usd =
            token1.total_value_locked * token1.derived_eth * eth_price_usd;

        self.sync_locked_value(&mut pool, &mut factory, token0.derived_eth, token1.derived_eth);

        self.store.put_pool(pool);
        self.store.put_token(token0);
        self.store.put_token(token1);
        self.store.put_factory(factory);
        Ok(())
    }

    pub(super) fn on_flash(
        &mut self,
        block: &BlockContext,
        pool_address: Address,
    ) -> Result<(), StateError> {
        let Some(mut pool) = self.store.pool(&pool_address) else {
            debug!(pool = %pool_address, "flash for unknown pool, skipping");
            return Ok(());
        };
        if self.gate.should_call(block.number) {
            if let Some(growth) = self.chain.pool_fee_growth(&pool_address) {
                pool.fee_growth_global0 = growth.fee_growth_global0;
                pool.fee_growth_global1 = growth.fee_growth_global1;
                self.store.put_pool(pool);
            }
        }
        Ok(())
    }

    /// Existing record, or a fresh one from chain metadata. When metadata
    /// cannot be determined (gated height or unreadable contract) the
    /// token is still created, with sentinel values, so the pool that
    /// references it is not lost.
    fn load_or_create_token(&mut self, block: &BlockContext, address: &Address) -> Token {
        if let Some(token) = self.store.token(address) {
            return token;
        }
        let metadata = if self.gate.should_call(block.number) {
            self.chain.token_metadata(address)
        } else {
            None
        };
        match metadata {
            Some(meta) => Token::new(*address, meta.symbol, meta.name, meta.decimals),
            None => {
                warn!(token = %address, "token metadata unavailable, creating sentinel record");
                Token::new(*address, "unknown".to_string(), "unknown".to_string(), 0)
            }
        }
    }
}
