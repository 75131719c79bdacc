//! Position-manager event handlers.
//!
//! Positions are not reconstructible from events alone: the tokens and
//! range of a freshly minted position only exist in the manager
//! contract, so first sight of a position id reads its parameters
//! through the chain accessor (subject to the call gate).

use super::ViewEngine;
use crate::chain::ChainStateAccessor;
use crate::error::StateError;
use crate::store::EntityStore;
use poolview_amm::convert_token_to_decimal;
use poolview_types::{Address, BlockContext, Pool, Position};
use rust_decimal::Decimal;
use tracing::debug;

impl<S: EntityStore, C: ChainStateAccessor> ViewEngine<S, C> {
    pub(super) fn on_increase_liquidity(
        &mut self,
        block: &BlockContext,
        position_id: u64,
        liquidity: u128,
        amount0_raw: u128,
        amount1_raw: u128,
    ) -> Result<(), StateError> {
        let Some(mut position) = self.get_or_create_position(block, position_id) else {
            return Ok(());
        };
        if self.store.pool(&position.pool).is_none() {
            return Ok(());
        }

        let (amount0, amount1) = self.position_amounts(&position, amount0_raw, amount1_raw);
        position.liquidity += liquidity;
        position.deposited_token0 += amount0;
        position.deposited_token1 += amount1;
        position.amount_deposited_usd += self.position_usd(&position, amount0, amount1);

        self.refresh_position_fees(block, &mut position);
        self.save_with_snapshot(block, position);
        Ok(())
    }

    pub(super) fn on_decrease_liquidity(
        &mut self,
        block: &BlockContext,
        position_id: u64,
        liquidity: u128,
        amount0_raw: u128,
        amount1_raw: u128,
    ) -> Result<(), StateError> {
        let Some(mut position) = self.get_or_create_position(block, position_id) else {
            return Ok(());
        };
        if self.store.pool(&position.pool).is_none() {
            return Ok(());
        }

        let (amount0, amount1) = self.position_amounts(&position, amount0_raw, amount1_raw);
        position.liquidity = position.liquidity.saturating_sub(liquidity);
        position.withdrawn_token0 += amount0;
        position.withdrawn_token1 += amount1;
        position.amount_withdrawn_usd += self.position_usd(&position, amount0, amount1);

        self.refresh_position_fees(block, &mut position);
        self.save_with_snapshot(block, position);
        Ok(())
    }

    pub(super) fn on_collect_position(
        &mut self,
        block: &BlockContext,
        position_id: u64,
        amount0_raw: u128,
        amount1_raw: u128,
    ) -> Result<(), StateError> {
        let Some(mut position) = self.get_or_create_position(block, position_id) else {
            return Ok(());
        };
        if self.store.pool(&position.pool).is_none() {
            return Ok(());
        }

        let (amount0, amount1) = self.position_amounts(&position, amount0_raw, amount1_raw);
        position.collected_token0 += amount0;
        position.collected_token1 += amount1;
        // everything collected beyond what was withdrawn as principal is fees
        position.collected_fees_token0 =
            position.collected_token0 - position.withdrawn_token0;
        position.collected_fees_token1 =
            position.collected_token1 - position.withdrawn_token1;
        position.amount_collected_usd += self.position_usd(&position, amount0, amount1);

        self.refresh_position_fees(block, &mut position);
        self.save_with_snapshot(block, position);
        Ok(())
    }

    pub(super) fn on_transfer_position(
        &mut self,
        block: &BlockContext,
        position_id: u64,
        to: Address,
    ) -> Result<(), StateError> {
        let Some(mut position) = self.get_or_create_position(block, position_id) else {
            return Ok(());
        };
        position.owner = to;
        self.save_with_snapshot(block, position);
        Ok(())
    }

    /// First sight of a position id reads its immutable parameters from
    /// the manager contract. Returns `None` when the id cannot be
    /// resolved, either because the gate disallows calls at this height
    /// or because the contract read reverted (burned or foreign id).
    fn get_or_create_position(
        &mut self,
        block: &BlockContext,
        position_id: u64,
    ) -> Option<Position> {
        if let Some(position) = self.store.position(position_id) {
            return Some(position);
        }
        if !self.gate.should_call(block.number) {
            return None;
        }
        let Some(params) = self.chain.position_params(position_id) else {
            debug!(position_id, "position parameters unreadable, skipping");
            return None;
        };
        let pool_address =
            self.chain
                .pool_for_pair(&params.token0, &params.token1, params.fee)?;
        // the pair may predate our factory watch; record a shell so the
        // position has a pool to hang off
        if self.store.pool(&pool_address).is_none() {
            self.store.put_pool(Pool::new(
                pool_address,
                params.token0,
                params.token1,
                params.fee,
                block,
            ));
        }
        Some(Position::new(
            position_id,
            pool_address,
            params.token0,
            params.token1,
            params.tick_lower,
            params.tick_upper,
            params.fee_growth_inside0,
            params.fee_growth_inside1,
        ))
    }

    fn position_amounts(
        &self,
        position: &Position,
        amount0_raw: u128,
        amount1_raw: u128,
    ) -> (Decimal, Decimal) {
        let decimals0 = self
            .store
            .token(&position.token0)
            .map(|token| token.decimals)
            .unwrap_or(0);
        let decimals1 = self
            .store
            .token(&position.token1)
            .map(|token| token.decimals)
            .unwrap_or(0);
        (
            convert_token_to_decimal(amount0_raw, decimals0),
            convert_token_to_decimal(amount1_raw, decimals1),
        )
    }

    fn position_usd(&self, position: &Position, amount0: Decimal, amount1: Decimal) -> Decimal {
        let eth_price_usd = self.eth_price_usd();
        let price0 = self
            .store
            .token(&position.token0)
            .map(|token| token.derived_eth * eth_price_usd)
            .unwrap_or(Decimal::ZERO);
        let price1 = self
            .store
            .token(&position.token1)
            .map(|token| token.derived_eth * eth_price_usd)
            .unwrap_or(Decimal::ZERO);
        amount0 * price0 + amount1 * price1
    }

    /// Fee growth inside the range is not derivable from events; refresh
    /// it from the manager contract when the gate allows.
    fn refresh_position_fees(&self, block: &BlockContext, position: &mut Position) {
        if !self.gate.should_call(block.number) {
            return;
        }
        if let Some(params) = self.chain.position_params(position.id) {
            position.fee_growth_inside0_last = params.fee_growth_inside0;
            position.fee_growth_inside1_last = params.fee_growth_inside1;
        }
    }

    fn save_with_snapshot(&mut self, block: &BlockContext, position: Position) {
        self.store.put_position_snapshot(position.snapshot(block));
        self.store.put_position(position);
    }
}
