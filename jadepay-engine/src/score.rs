use crate::types::{Fan, Points};

/// Payment for a zero-fan hand when no rule overrides it.
pub const DEFAULT_BASE_UNIT: Points = 100;

/// Highest tier that still doubles. 2^13 x base unit is the maximum payout.
pub const FAN_CAP: Fan = 13;

/// Converts a declared fan tier into a per-payer payment.
///
/// `fan <= 0` pays the base unit (minimum stake). Above that each tier
/// doubles, up to `FAN_CAP`. The multiplication saturates instead of
/// wrapping for very large base units.
pub fn fan_to_points(fan: Fan, base_unit: Points) -> Points {
    fan_to_points_capped(fan, base_unit, FAN_CAP)
}

/// Same as [`fan_to_points`] with a caller-chosen ceiling tier.
pub fn fan_to_points_capped(fan: Fan, base_unit: Points, cap: Fan) -> Points {
    if fan <= 0 {
        return base_unit;
    }
    let tier = fan.min(cap).clamp(0, 31) as u32;
    base_unit.saturating_mul(1u32 << tier)
}
