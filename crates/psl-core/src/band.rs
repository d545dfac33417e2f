//! Score bands: eight named tiers partitioning the 1.0–10.0 range.

use serde::Serialize;

use crate::geometry::round1;
use crate::score::{MAX_SCORE, MIN_SCORE};

/// One tier of the composite score range. Bounds are inclusive and lie on
/// the one-decimal grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
    pub label: &'static str,
    /// Presentation color (CSS hex).
    pub color: &'static str,
    pub top_percent: &'static str,
}

pub static BANDS: [Band; 8] = [
    Band { min: 1.0, max: 3.9, label: "Below Average", color: "#ef4444", top_percent: "Bottom 30%" },
    Band { min: 4.0, max: 5.4, label: "Average", color: "#f97316", top_percent: "50%" },
    Band { min: 5.5, max: 6.9, label: "Above Average", color: "#eab308", top_percent: "Top 40%" },
    Band { min: 7.0, max: 8.2, label: "Attractive", color: "#22c55e", top_percent: "Top 25%" },
    Band { min: 8.3, max: 8.9, label: "Very Attractive", color: "#10b981", top_percent: "Top 15%" },
    Band { min: 9.0, max: 9.4, label: "Elite", color: "#06b6d4", top_percent: "Top 5%" },
    Band { min: 9.5, max: 9.8, label: "Exceptional", color: "#6366f1", top_percent: "Top 2%" },
    Band { min: 9.9, max: 10.0, label: "Divine", color: "#a855f7", top_percent: "Top 1%" },
];

impl Band {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score <= self.max
    }
}

/// Band for a composite score.
///
/// The score is rounded to one decimal and clamped to [1.0, 10.0] first, so
/// every finite input lands in exactly one band. NaN maps to the lowest band.
pub fn classify(score: f64) -> &'static Band {
    let s = round1(score).clamp(MIN_SCORE, MAX_SCORE);
    BANDS.iter().find(|b| b.contains(s)).unwrap_or(&BANDS[0])
}

/// Position of a band on the tenths grid (4.0 -> 40).
pub(crate) fn tenths(v: f64) -> i64 {
    (v * 10.0).round() as i64
}
