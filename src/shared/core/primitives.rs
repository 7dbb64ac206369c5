// Numeric primitives shared by every ledger computation.
//
// Purpose
// - Keep hour arithmetic on a two decimal grid so repeated postings never drift.
//
// Boundaries
// - Pure functions only. No input or output.

pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Rounds half-up to two decimal places.
///
/// Half-up means ties move towards positive infinity, so `-0.125` becomes `-0.12`
/// and `0.125` becomes `0.13`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    // normalise -0.0 so serialized documents never show a signed zero
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn minutes_to_hours(minutes: i64) -> f64 {
    minutes as f64 / MINUTES_PER_HOUR
}

/// Converts hours to minutes on the same two decimal grid.
pub fn hours_to_minutes(hours: f64) -> f64 {
    round2(hours * MINUTES_PER_HOUR)
}
