//! Composite score and potential.
//!
//! The seven sub-scores are combined with fixed weights into `raw` (0–100),
//! then mapped onto the visible 1.0–10.0 scale through a power curve.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{clamp_score, round1};

/// Exponent of the raw → overall curve. Values below 1 stretch the top end.
pub const CURVE_EXPONENT: f64 = 0.70;
const CURVE_SPAN: f64 = 9.0;
const CURVE_FLOOR: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;
pub const MIN_SCORE: f64 = 1.0;

/// Minimum potential gain over the current overall score.
const MIN_POTENTIAL_GAIN: f64 = 0.3;
/// Potential gain when the two weakest sub-scores are both 0.
const MAX_POTENTIAL_GAIN: f64 = 1.8;

/// The seven sub-score dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Symmetry,
    FacialThirds,
    Jawline,
    Eyes,
    CanthalTilt,
    Lips,
    /// Detector confidence, rescaled. A proxy, not a skin-texture measurement.
    DetectionQuality,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Symmetry,
        Metric::FacialThirds,
        Metric::Jawline,
        Metric::Eyes,
        Metric::CanthalTilt,
        Metric::Lips,
        Metric::DetectionQuality,
    ];

    /// Aggregation weight. Weights over [`Metric::ALL`] sum to 1.0.
    pub const fn weight(self) -> f64 {
        match self {
            Metric::Symmetry => 0.25,
            Metric::FacialThirds => 0.15,
            Metric::Jawline => 0.15,
            Metric::Eyes => 0.20,
            Metric::CanthalTilt => 0.10,
            Metric::Lips => 0.08,
            Metric::DetectionQuality => 0.07,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Metric::Symmetry => "Symmetry",
            Metric::FacialThirds => "Facial thirds",
            Metric::Jawline => "Jawline",
            Metric::Eyes => "Eyes",
            Metric::CanthalTilt => "Canthal tilt",
            Metric::Lips => "Lips",
            Metric::DetectionQuality => "Detection quality",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SubScores {
    pub symmetry: f64,
    pub facial_thirds: f64,
    pub jawline: f64,
    pub eyes: f64,
    pub canthal_tilt: f64,
    pub lips: f64,
    pub detection_quality: f64,
}

impl SubScores {
    /// Every sub-score set to `v`.
    pub fn uniform(v: f64) -> Self {
        Self {
            symmetry: v,
            facial_thirds: v,
            jawline: v,
            eyes: v,
            canthal_tilt: v,
            lips: v,
            detection_quality: v,
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Symmetry => self.symmetry,
            Metric::FacialThirds => self.facial_thirds,
            Metric::Jawline => self.jawline,
            Metric::Eyes => self.eyes,
            Metric::CanthalTilt => self.canthal_tilt,
            Metric::Lips => self.lips,
            Metric::DetectionQuality => self.detection_quality,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::Symmetry => &mut self.symmetry,
            Metric::FacialThirds => &mut self.facial_thirds,
            Metric::Jawline => &mut self.jawline,
            Metric::Eyes => &mut self.eyes,
            Metric::CanthalTilt => &mut self.canthal_tilt,
            Metric::Lips => &mut self.lips,
            Metric::DetectionQuality => &mut self.detection_quality,
        };
        *slot = clamp_score(value);
    }

    /// Weighted sum of the sub-scores, in [0, 100].
    pub fn raw(&self) -> f64 {
        Metric::ALL
            .iter()
            .map(|&m| m.weight() * self.get(m))
            .sum()
    }

    /// The two lowest sub-scores, lowest first.
    pub fn weakest(&self) -> [(Metric, f64); 2] {
        let mut all: Vec<(Metric, f64)> = Metric::ALL.iter().map(|&m| (m, self.get(m))).collect();
        all.sort_by(|a, b| a.1.total_cmp(&b.1));
        [all[0], all[1]]
    }
}

/// Map a raw weighted score (0–100) onto the 1.0–10.0 scale, rounded to one decimal.
///
/// Monotonically non-decreasing in `raw`.
pub fn overall_from_raw(raw: f64) -> f64 {
    let boosted = (clamp_score(raw) / 100.0).powf(CURVE_EXPONENT) * CURVE_SPAN + CURVE_FLOOR;
    round1(boosted).min(MAX_SCORE)
}

/// Achievable score after working on the two weakest sub-scores.
///
/// Always at least `overall + 0.3`, capped at 10.0.
pub fn potential(overall: f64, sub: &SubScores) -> f64 {
    let [(_, a), (_, b)] = sub.weakest();
    let avg_weak = (a + b) / 2.0;
    let boost = ((100.0 - avg_weak) / 100.0) * MAX_POTENTIAL_GAIN;
    round1(overall + boost.max(MIN_POTENTIAL_GAIN)).min(MAX_SCORE)
}

/// Result of one analysis run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreProfile {
    #[serde(flatten)]
    pub sub: SubScores,
    /// Weighted sum before the curve, 0–100.
    pub raw: f64,
    /// Composite score, 1.0–10.0, one decimal.
    pub overall: f64,
    /// Achievable score, `overall ≤ potential ≤ 10.0`, one decimal.
    pub potential: f64,
}

impl ScoreProfile {
    /// Aggregate sub-scores into the composite and potential. Inputs are
    /// clamped to [0, 100] first.
    pub fn from_sub_scores(sub: SubScores) -> Self {
        let mut clamped = SubScores::default();
        for m in Metric::ALL {
            clamped.set(m, sub.get(m));
        }
        let raw = clamped.raw();
        let overall = overall_from_raw(raw);
        let potential = potential(overall, &clamped);
        Self {
            sub: clamped,
            raw,
            overall,
            potential,
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.sub.get(metric)
    }
}
