//! Fee-tier derived tick parameters.

/// Minimum distance between initialized ticks for a given fee tier.
///
/// `None` for fee tiers the factory never deploys; callers treat that as
/// a data-integrity fault rather than guessing a spacing.
pub fn fee_tier_to_tick_spacing(fee_tier: u32) -> Option<i32> {
    match fee_tier {
        100 => Some(1),
        500 => Some(10),
        3000 => Some(60),
        10000 => Some(200),
        _ => None,
    }
}
