//! Incremental state-update engine for an AMM derived view.
//!
//! The engine consumes a strictly ordered stream of decoded pool and
//! position events and maintains the entity records of
//! [`poolview_types`] inside a host-supplied [`EntityStore`]. Where event
//! data alone cannot reconstruct a field (per-tick fee growth, position
//! parameters), it issues read-only queries through a
//! [`ChainStateAccessor`], gated by a [`CallGate`] cost policy.
//!
//! Execution is single threaded: the host applies events one at a time in
//! (block, transaction index, log index) order, and every handler is a
//! deterministic function of the current store contents, the event
//! payload, and the accessor's responses. Replaying the same sequence
//! from the same snapshot reproduces the same store, which is what makes
//! chain reorganizations safe to handle with snapshot/rollback alone.
//!
//! ```no_run
//! use poolview_state_market::{MemoryStore, ViewEngine};
//! use poolview_types::{Address, BlockContext, Event};
//! # struct Rpc;
//! # impl poolview_state_market::ChainStateAccessor for Rpc {
//! #     fn tick_fee_growth(&self, _: &Address, _: i32) -> Option<poolview_state_market::TickFeeGrowth> { None }
//! #     fn position_params(&self, _: u64) -> Option<poolview_state_market::PositionParams> { None }
//! #     fn pool_for_pair(&self, _: &Address, _: &Address, _: u32) -> Option<Address> { None }
//! #     fn pool_fee_growth(&self, _: &Address) -> Option<poolview_state_market::PoolFeeGrowth> { None }
//! #     fn token_metadata(&self, _: &Address) -> Option<poolview_state_market::TokenMetadata> { None }
//! # }
//!
//! let mut engine = ViewEngine::new(MemoryStore::default(), Rpc, Address::ZERO);
//! let block = BlockContext { number: 6_000_000, timestamp: 1_700_000_000 };
//! engine.apply(&block, Event::Flash { pool: Address::ZERO })?;
//! # Ok::<(), poolview_state_market::StateError>(())
//! ```

pub mod chain;
pub mod engine;
pub mod error;
pub mod pricing;
pub mod store;
pub mod tick_ledger;
pub mod volume;

pub use chain::{
    CallGate, ChainStateAccessor, PoolFeeGrowth, PositionParams, TickFeeGrowth,
    TokenMetadata, INDEXED_CHECKPOINT_BLOCK,
};
pub use engine::ViewEngine;
pub use error::StateError;
pub use pricing::{PriceOracle, PricingConfig};
pub use store::{EntityStore, MemoryStore};
pub use tick_ledger::TickLedger;
pub use volume::VolumeAttributor;
