//! Engine error types.
//!
//! Only data-integrity faults surface as errors; missing references and
//! reverted chain calls degrade gracefully inside the handlers instead
//! (the affected record simply keeps its previous values).

use poolview_types::Address;
use thiserror::Error;

/// A fault that indicates an ordering or decoding defect upstream.
/// Continuing past one of these would corrupt the tick invariants, so the
/// host must treat them as fatal for the current event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("burn references tick {tick} of pool {pool}, which was never created")]
    MissingTick { pool: Address, tick: i32 },

    #[error("tick {tick} of pool {pool} would drop below zero gross liquidity")]
    LiquidityUnderflow { pool: Address, tick: i32 },

    #[error("pool {pool} carries unknown fee tier {fee}")]
    UnknownFeeTier { pool: Address, fee: u32 },
}
