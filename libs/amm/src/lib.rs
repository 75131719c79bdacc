//! Pure AMM math shared across the poolview crates.
//!
//! No entity types and no I/O here, only conversions between raw on-chain
//! integers and the decimal values the derived view stores.

pub mod price;
pub mod tick;

pub use price::{
    convert_signed_token_to_decimal, convert_token_to_decimal, exponent_to_decimal,
    safe_div, sqrt_price_x96_to_token_prices,
};
pub use tick::fee_tier_to_tick_spacing;
