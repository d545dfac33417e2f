//! Point-distance, ratio and ratio-normalization primitives.

use crate::types::Point;

/// Euclidean distance between two points. Does not overflow for large
/// coordinates unless the distance itself exceeds `f64::MAX`.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// `a / b`. The caller guarantees `b != 0`.
pub fn ratio(a: f64, b: f64) -> f64 {
    debug_assert!(b != 0.0, "ratio with zero denominator");
    a / b
}

/// Clamp to the sub-score range [0, 100].
pub fn clamp_score(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Round to one decimal place, half away from zero.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Score a measured ratio against an ideal.
///
/// 100 at the ideal, falling linearly to 0 at `tolerance` away from it, and
/// 0 beyond. `tolerance` must be positive.
pub fn normalize(measured: f64, ideal: f64, tolerance: f64) -> f64 {
    debug_assert!(tolerance > 0.0, "tolerance must be positive");
    clamp_score(100.0 - ((measured - ideal).abs() / tolerance) * 100.0)
}

/// Invert a relative asymmetry into a score: 0 asymmetry scores 100.
pub fn symmetry_score(relative_asymmetry: f64, scale: f64) -> f64 {
    100.0 - clamp_score(relative_asymmetry * scale)
}
