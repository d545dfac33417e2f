//! Sub-score calculators.
//!
//! Each calculator is a free function over a [`Face`] returning a value in
//! [0, 100]. Degenerate geometry (zero or overflowing spans) is reported as
//! [`AnalysisError::MalformedLandmarks`] rather than scored.

use crate::analysis::AnalysisError;
use crate::geometry::{clamp_score, distance, normalize, ratio, symmetry_score};
use crate::score::{Metric, SubScores};
use crate::types::{idx, LandmarkSet};

/// Relative asymmetry (fraction of face width) is multiplied by this before
/// being inverted into a score. 20% asymmetry scores 0.
const ASYMMETRY_SCALE: f64 = 500.0;

const SYMMETRY_EYE_WEIGHT: f64 = 0.6;
const SYMMETRY_BROW_WEIGHT: f64 = 0.4;

const THIRDS_BALANCE: RatioTarget = RatioTarget::new(1.0, 0.20, 0.5);
const THIRDS_MIDDLE: RatioTarget = RatioTarget::new(0.32, 0.07, 0.25);
const THIRDS_LOWER: RatioTarget = RatioTarget::new(0.35, 0.07, 0.25);

const JAW_WIDTH: RatioTarget = RatioTarget::new(0.75, 0.15, 0.65);
const JAW_CHIN_SYMMETRY_WEIGHT: f64 = 0.35;

const EYE_WIDTH: RatioTarget = RatioTarget::new(0.20, 0.04, 0.40);
const EYE_GAP: RatioTarget = RatioTarget::new(0.20, 0.04, 0.35);
const EYE_SYMMETRY_WEIGHT: f64 = 0.25;

/// Tilt (fraction of face width) to score points around the level-eye 50.
const CANTHAL_TILT_GAIN: f64 = 600.0;
const CANTHAL_TILT_NEUTRAL: f64 = 50.0;

const LIP_RATIO: RatioTarget = RatioTarget::new(0.40, 0.08, 1.0);

const DETECTION_QUALITY_GAIN: f64 = 85.0;
const DETECTION_QUALITY_OFFSET: f64 = 10.0;

/// Spans shorter than this (in pixels) are treated as degenerate.
const MIN_SPAN: f64 = 1e-6;

/// Ideal ratio, tolerance and blend weight of one ratio-based term.
#[derive(Debug, Clone, Copy)]
struct RatioTarget {
    ideal: f64,
    tolerance: f64,
    weight: f64,
}

impl RatioTarget {
    const fn new(ideal: f64, tolerance: f64, weight: f64) -> Self {
        Self {
            ideal,
            tolerance,
            weight,
        }
    }

    fn weighted(&self, measured: f64) -> f64 {
        self.weight * normalize(measured, self.ideal, self.tolerance)
    }
}

/// A validated landmark set plus the per-face quantities every calculator needs.
pub struct Face<'a> {
    landmarks: &'a LandmarkSet,
    confidence: f64,
    /// Distance between the outer jaw landmarks (0, 16).
    width: f64,
    /// x coordinate halfway between the outer jaw landmarks.
    midline: f64,
}

impl<'a> Face<'a> {
    pub fn new(landmarks: &'a LandmarkSet, confidence: f64) -> Result<Self, AnalysisError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(AnalysisError::MalformedLandmarks(format!(
                "detection confidence {confidence} outside [0, 1]"
            )));
        }
        let left = landmarks[idx::JAW_LEFT];
        let right = landmarks[idx::JAW_RIGHT];
        let width = nonzero(distance(left, right), "face width")?;
        Ok(Self {
            landmarks,
            confidence,
            width,
            midline: (left.x + right.x) / 2.0,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    fn relative(&self, span: f64) -> f64 {
        ratio(span, self.width)
    }
}

fn nonzero(span: f64, what: &str) -> Result<f64, AnalysisError> {
    if !span.is_finite() {
        return Err(AnalysisError::MalformedLandmarks(format!(
            "degenerate geometry: {what} is not finite"
        )));
    }
    if span.abs() < MIN_SPAN {
        return Err(AnalysisError::MalformedLandmarks(format!(
            "degenerate geometry: {what} is zero"
        )));
    }
    Ok(span)
}

/// Calculator signature shared by every sub-score.
pub type Calculator = fn(&Face<'_>) -> Result<f64, AnalysisError>;

/// Sub-score calculators keyed by metric, in aggregation order.
pub const CALCULATORS: [(Metric, Calculator); 7] = [
    (Metric::Symmetry, symmetry),
    (Metric::FacialThirds, facial_thirds),
    (Metric::Jawline, jawline),
    (Metric::Eyes, eyes),
    (Metric::CanthalTilt, canthal_tilt),
    (Metric::Lips, lips),
    (Metric::DetectionQuality, detection_quality),
];

/// Run every calculator. The first failure aborts the whole computation, and
/// a non-finite sub-score counts as a failure.
pub fn compute_all(face: &Face<'_>) -> Result<SubScores, AnalysisError> {
    let mut sub = SubScores::default();
    for (metric, calc) in CALCULATORS {
        let value = calc(face)?;
        if !value.is_finite() {
            return Err(AnalysisError::MalformedLandmarks(format!(
                "{} sub-score is not finite",
                metric.label()
            )));
        }
        tracing::debug!(metric = ?metric, value, "sub-score");
        sub.set(metric, value);
    }
    Ok(sub)
}

/// Eye-center offset from the midline (0.6) blended with eyebrow height
/// difference (0.4), both relative to face width.
pub fn symmetry(face: &Face<'_>) -> Result<f64, AnalysisError> {
    let lm = face.landmarks;
    let left_eye = lm.centroid(idx::EYE_LEFT);
    let right_eye = lm.centroid(idx::EYE_RIGHT);
    let left_offset = face.midline - left_eye.x;
    let right_offset = right_eye.x - face.midline;
    let eye_asym = face.relative((left_offset - right_offset).abs());

    let left_brow = lm.centroid(idx::BROW_LEFT);
    let right_brow = lm.centroid(idx::BROW_RIGHT);
    let brow_asym = face.relative((left_brow.y - right_brow.y).abs());

    Ok(SYMMETRY_EYE_WEIGHT * symmetry_score(eye_asym, ASYMMETRY_SCALE)
        + SYMMETRY_BROW_WEIGHT * symmetry_score(brow_asym, ASYMMETRY_SCALE))
}

/// Vertical proportions between brow line, nose tip and chin.
pub fn facial_thirds(face: &Face<'_>) -> Result<f64, AnalysisError> {
    let lm = face.landmarks;
    let brow_y = lm.centroid(idx::BROWS).y;
    let nose_y = lm[idx::NOSE_TIP].y;
    let chin_y = lm[idx::CHIN].y;

    let middle = (nose_y - brow_y).abs();
    let lower = nonzero((chin_y - nose_y).abs(), "lower third")?;
    let total = nonzero((chin_y - brow_y).abs(), "face height")?;

    Ok(THIRDS_BALANCE.weighted(ratio(middle, lower))
        + THIRDS_MIDDLE.weighted(ratio(middle, total))
        + THIRDS_LOWER.weighted(ratio(lower, total)))
}

/// Mid-jaw width relative to face width, blended with chin symmetry.
pub fn jawline(face: &Face<'_>) -> Result<f64, AnalysisError> {
    let lm = face.landmarks;
    let jaw_width = distance(lm[idx::JAW_MID_LEFT], lm[idx::JAW_MID_RIGHT]);

    let chin = lm[idx::CHIN];
    let left = distance(lm[idx::CHIN_LEFT], chin);
    let right = distance(lm[idx::CHIN_RIGHT], chin);
    let chin_asym = face.relative((left - right).abs());

    Ok(JAW_WIDTH.weighted(face.relative(jaw_width))
        + JAW_CHIN_SYMMETRY_WEIGHT * symmetry_score(chin_asym, ASYMMETRY_SCALE))
}

/// Eye width, inter-eye gap and left/right eye-width symmetry.
pub fn eyes(face: &Face<'_>) -> Result<f64, AnalysisError> {
    let lm = face.landmarks;
    let left = distance(lm[idx::EYE_LEFT_OUTER], lm[idx::EYE_LEFT_INNER]);
    let right = distance(lm[idx::EYE_RIGHT_INNER], lm[idx::EYE_RIGHT_OUTER]);
    let gap = distance(lm[idx::EYE_LEFT_INNER], lm[idx::EYE_RIGHT_INNER]);
    let width_asym = face.relative((left - right).abs());

    Ok(EYE_WIDTH.weighted(face.relative((left + right) / 2.0))
        + EYE_GAP.weighted(face.relative(gap))
        + EYE_SYMMETRY_WEIGHT * symmetry_score(width_asym, ASYMMETRY_SCALE))
}

/// Outer-corner elevation above the inner corner, averaged over both eyes.
/// A level eye scores 50; upturned outer corners score higher.
pub fn canthal_tilt(face: &Face<'_>) -> Result<f64, AnalysisError> {
    let lm = face.landmarks;
    // Image y grows downward: a raised outer corner has the smaller y.
    let left = lm[idx::EYE_LEFT_INNER].y - lm[idx::EYE_LEFT_OUTER].y;
    let right = lm[idx::EYE_RIGHT_INNER].y - lm[idx::EYE_RIGHT_OUTER].y;
    let tilt = face.relative((left + right) / 2.0);
    Ok(clamp_score(CANTHAL_TILT_NEUTRAL + tilt * CANTHAL_TILT_GAIN))
}

/// Upper-lip height as a share of total lip height.
pub fn lips(face: &Face<'_>) -> Result<f64, AnalysisError> {
    let lm = face.landmarks;
    let upper = distance(lm[idx::LIP_TOP], lm[idx::LIP_UPPER_INNER]);
    let total = nonzero(distance(lm[idx::LIP_TOP], lm[idx::LIP_BOTTOM]), "lip height")?;
    Ok(LIP_RATIO.weighted(ratio(upper, total)))
}

/// Detector confidence rescaled to [0, 100]. Says nothing about actual skin.
pub fn detection_quality(face: &Face<'_>) -> Result<f64, AnalysisError> {
    Ok(clamp_score(face.confidence * DETECTION_QUALITY_GAIN + DETECTION_QUALITY_OFFSET))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{symmetric_face, symmetric_points};
    use crate::types::Point;

    fn face_of(points: Vec<Point>) -> LandmarkSet {
        LandmarkSet::new(points).unwrap()
    }

    #[test]
    fn test_symmetric_face_symmetry() {
        let lm = symmetric_face();
        let face = Face::new(&lm, 0.9).unwrap();
        assert!((face.width() - 120.0).abs() < 1e-9);
        assert!((symmetry(&face).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_shifted_eye_lowers_symmetry() {
        let mut pts = symmetric_points();
        for p in &mut pts[42..=47] {
            p.x += 6.0;
        }
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        // 6px / 120px = 5% -> eye component 75, brows untouched.
        assert!((symmetry(&face).unwrap() - 85.0).abs() < 1e-6);
    }

    #[test]
    fn test_brow_height_difference() {
        let mut pts = symmetric_points();
        for p in &mut pts[22..=26] {
            p.y -= 3.0;
        }
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        // 3 / 120 * 500 = 12.5 -> brow component 87.5
        assert!((symmetry(&face).unwrap() - 95.0).abs() < 1e-6);
    }

    #[test]
    fn test_facial_thirds_balanced() {
        let lm = symmetric_face();
        let face = Face::new(&lm, 0.9).unwrap();
        // middle == lower, each half of total: only the balance term scores.
        assert!((facial_thirds(&face).unwrap() - 50.0).abs() < 1e-9);
    }

    /// Jaw term of the fixture: mid-jaw ratio sqrt(2)/2 against 0.75.
    fn fixture_jaw_term() -> f64 {
        0.65 * (100.0 - (0.75 - std::f64::consts::SQRT_2 / 2.0) / 0.15 * 100.0)
    }

    #[test]
    fn test_jawline_symmetric_chin() {
        let lm = symmetric_face();
        let face = Face::new(&lm, 0.9).unwrap();
        let score = jawline(&face).unwrap();
        assert!((score - (fixture_jaw_term() + 35.0)).abs() < 1e-9, "jawline = {score}");
    }

    #[test]
    fn test_jawline_asymmetric_chin() {
        let mut pts = symmetric_points();
        let chin = pts[idx::CHIN];
        let left = distance(pts[idx::CHIN_LEFT], chin);
        // Right chin span 6px longer than the left: 5% of width -> 75.
        pts[idx::CHIN_RIGHT] = Point::new(chin.x + left + 6.0, chin.y);
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        let score = jawline(&face).unwrap();
        assert!((score - (fixture_jaw_term() + 0.35 * 75.0)).abs() < 1e-9, "jawline = {score}");
    }

    #[test]
    fn test_eyes_ideal() {
        let lm = symmetric_face();
        let face = Face::new(&lm, 0.9).unwrap();
        assert!((eyes(&face).unwrap() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_eyes_unequal_widths() {
        let mut pts = symmetric_points();
        pts[idx::EYE_RIGHT_OUTER].x += 6.0;
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        // Widths 24 and 30: mean 0.225 of width -> 37.5 * 0.40 = 15.
        // Gap untouched -> 35. Width asymmetry 5% -> 75 * 0.25 = 18.75.
        assert!((eyes(&face).unwrap() - 68.75).abs() < 1e-6);
    }

    #[test]
    fn test_canthal_tilt_level_and_positive() {
        let lm = symmetric_face();
        let face = Face::new(&lm, 0.9).unwrap();
        assert!((canthal_tilt(&face).unwrap() - 50.0).abs() < 1e-9);

        let mut pts = symmetric_points();
        pts[36].y -= 3.0;
        pts[45].y -= 3.0;
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        // 3 / 120 = 0.025 * 600 = 15
        assert!((canthal_tilt(&face).unwrap() - 65.0).abs() < 1e-6);
    }

    #[test]
    fn test_canthal_tilt_negative() {
        let mut pts = symmetric_points();
        pts[36].y += 12.0;
        pts[45].y += 12.0;
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        assert_eq!(canthal_tilt(&face).unwrap(), 0.0);
    }

    #[test]
    fn test_lips_ideal() {
        let lm = symmetric_face();
        let face = Face::new(&lm, 0.9).unwrap();
        assert!((lips(&face).unwrap() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_lips_off_ideal() {
        let mut pts = symmetric_points();
        pts[idx::LIP_UPPER_INNER].y += 0.4;
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        // upper 4.4 / total 10 = 0.44, half the tolerance away from 0.40.
        assert!((lips(&face).unwrap() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_detection_quality() {
        let lm = symmetric_face();
        assert!((detection_quality(&Face::new(&lm, 0.9).unwrap()).unwrap() - 86.5).abs() < 1e-9);
        assert_eq!(detection_quality(&Face::new(&lm, 0.0).unwrap()).unwrap(), 10.0);
        assert_eq!(detection_quality(&Face::new(&lm, 1.0).unwrap()).unwrap(), 95.0);
    }

    #[test]
    fn test_confidence_out_of_range() {
        let lm = symmetric_face();
        assert!(Face::new(&lm, 1.5).is_err());
        assert!(Face::new(&lm, f64::NAN).is_err());
    }

    #[test]
    fn test_zero_face_width() {
        let mut pts = symmetric_points();
        pts[16] = pts[0];
        let lm = face_of(pts);
        let err = Face::new(&lm, 0.9).err().unwrap();
        assert!(err.to_string().contains("face width"));
    }

    #[test]
    fn test_overflowing_face_width() {
        let mut pts = symmetric_points();
        pts[idx::JAW_LEFT] = Point::new(-1e308, 100.0);
        pts[idx::JAW_RIGHT] = Point::new(1e308, 100.0);
        let lm = face_of(pts);
        let err = Face::new(&lm, 0.9).err().unwrap();
        assert!(err.to_string().contains("not finite"));
    }

    #[test]
    fn test_overflowing_chin_span_rejected() {
        let mut pts = symmetric_points();
        pts[idx::CHIN_LEFT] = Point::new(-1.7e308, -1.7e308);
        pts[idx::CHIN_RIGHT] = Point::new(1.7e308, -1.7e308);
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        assert!(jawline(&face).unwrap().is_nan());
        let err = compute_all(&face).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedLandmarks(_)));
        assert!(err.to_string().contains("Jawline"));
    }

    #[test]
    fn test_scale_invariant() {
        let lm = symmetric_face();
        let base = compute_all(&Face::new(&lm, 0.9).unwrap()).unwrap();
        let scaled: Vec<Point> = symmetric_points()
            .into_iter()
            .map(|p| Point::new(p.x * 1e200, p.y * 1e200))
            .collect();
        let lm = face_of(scaled);
        let big = compute_all(&Face::new(&lm, 0.9).unwrap()).unwrap();
        for m in Metric::ALL {
            assert!((base.get(m) - big.get(m)).abs() < 1e-6, "{m}");
        }
    }

    #[test]
    fn test_collapsed_lips_fail() {
        let mut pts = symmetric_points();
        pts[57] = pts[51];
        let lm = face_of(pts);
        let face = Face::new(&lm, 0.9).unwrap();
        assert!(matches!(lips(&face), Err(AnalysisError::MalformedLandmarks(_))));
    }

    #[test]
    fn test_compute_all_in_range() {
        let lm = symmetric_face();
        let face = Face::new(&lm, 0.9).unwrap();
        let sub = compute_all(&face).unwrap();
        for m in Metric::ALL {
            let v = sub.get(m);
            assert!((0.0..=100.0).contains(&v), "{m} = {v}");
        }
    }
}
