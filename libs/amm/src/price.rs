//! Conversions between raw on-chain integers and decimal amounts.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 2^96 — the fixed-point scale of pool sqrt prices.
const Q96: f64 = 79_228_162_514_264_337_593_543_950_336.0;

/// Division that yields zero instead of erroring on a zero denominator.
/// Pools with no observed price produce zero-valued rates, not failures.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// 10^decimals, saturating at `Decimal::MAX` for absurd decimal counts so
/// the subsequent division degrades toward zero instead of panicking.
pub fn exponent_to_decimal(decimals: u32) -> Decimal {
    let mut result = Decimal::ONE;
    for _ in 0..decimals {
        result = match result.checked_mul(dec!(10)) {
            Some(value) => value,
            None => return Decimal::MAX,
        };
    }
    result
}

/// Scale a raw unsigned token amount by the token's decimals.
pub fn convert_token_to_decimal(raw: u128, decimals: u32) -> Decimal {
    let value = Decimal::from_u128(raw).unwrap_or(Decimal::MAX);
    safe_div(value, exponent_to_decimal(decimals))
}

/// Scale a raw signed amount (swap deltas can be negative).
pub fn convert_signed_token_to_decimal(raw: i128, decimals: u32) -> Decimal {
    let value = Decimal::from_i128(raw).unwrap_or(if raw < 0 {
        Decimal::MIN
    } else {
        Decimal::MAX
    });
    safe_div(value, exponent_to_decimal(decimals))
}

/// Convert a pool's Q64.96 sqrt price into (token0 price, token1 price).
///
/// Squaring a 160-bit value exceeds `Decimal`'s 96-bit mantissa, so the
/// ratio goes through f64 first; 53 bits of precision is ample for a
/// derived spot price, and the computation is deterministic.
pub fn sqrt_price_x96_to_token_prices(
    sqrt_price_x96: u128,
    token0_decimals: u32,
    token1_decimals: u32,
) -> (Decimal, Decimal) {
    let ratio = sqrt_price_x96 as f64 / Q96;
    let scale = 10f64.powi(token0_decimals as i32 - token1_decimals as i32);
    let price1 = Decimal::from_f64(ratio * ratio * scale).unwrap_or(Decimal::ZERO);
    let price0 = safe_div(Decimal::ONE, price1);
    (price0, price1)
}

/// Lossy f64 view of a decimal, for callers that only need magnitude.
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
