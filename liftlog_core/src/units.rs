//! Unit normalization and conversion.
//!
//! Weights are stored in kilograms. Pounds are accepted on input and offered
//! on display; each direction rounds exactly once, to two decimals.

use crate::MassUnit;

/// Kilograms per pound (exact, by definition)
pub const KG_PER_LB: f64 = 0.45359237;

/// Metres per kilometre
const M_PER_KM: f64 = 1000.0;

/// Map a unit token to a mass unit
///
/// Case-insensitive. `kg`/`kgs` and `lb`/`lbs` are recognised; anything else,
/// including an empty token, is taken as kilograms.
pub fn normalize_unit(token: &str) -> MassUnit {
    match token.trim().to_lowercase().as_str() {
        "lb" | "lbs" => MassUnit::Lb,
        _ => MassUnit::Kg,
    }
}

/// Convert an input weight to kilograms
pub fn to_kg(value: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kg => value,
        MassUnit::Lb => round_to(value * KG_PER_LB, 2),
    }
}

/// Project a stored kilogram weight into the display unit
pub fn to_display(value_kg: f64, unit: MassUnit) -> f64 {
    match unit {
        MassUnit::Kg => round_to(value_kg, 2),
        MassUnit::Lb => round_to(value_kg / KG_PER_LB, 2),
    }
}

/// Convert a distance token to kilometres, rounded to three decimals
///
/// `m` means metres; `km`, `k` and anything else are already kilometres.
pub fn distance_to_km(value: f64, unit: &str) -> f64 {
    let km = if unit == "m" { value / M_PER_KM } else { value };
    round_to(km, 3)
}

/// Parse an `mm:ss` clock into total seconds
pub fn parse_clock(clock: &str) -> Option<u32> {
    let (minutes, seconds) = clock.split_once(':')?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    let seconds: u32 = seconds.trim().parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Render a quantity with at most two decimals and no trailing zeros
pub fn format_quantity(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
