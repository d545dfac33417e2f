use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::analysis::AnalysisError;

/// Number of points in the 68-point (iBUG / dlib) landmark layout.
pub const LANDMARK_COUNT: usize = 68;

/// Fixed anatomical indices into a 68-point landmark set.
///
/// "Left" and "right" are image-relative: the first eye (36–41) is the
/// one with the smaller x coordinate in a frontal photo.
pub mod idx {
    use std::ops::RangeInclusive;

    pub const JAW: RangeInclusive<usize> = 0..=16;
    pub const JAW_LEFT: usize = 0;
    pub const JAW_RIGHT: usize = 16;
    pub const JAW_MID_LEFT: usize = 4;
    pub const JAW_MID_RIGHT: usize = 12;
    pub const CHIN_LEFT: usize = 6;
    pub const CHIN_RIGHT: usize = 10;
    pub const CHIN: usize = 8;

    pub const BROW_LEFT: RangeInclusive<usize> = 17..=21;
    pub const BROW_RIGHT: RangeInclusive<usize> = 22..=26;
    pub const BROWS: RangeInclusive<usize> = 17..=26;

    pub const NOSE_BRIDGE_TOP: usize = 27;
    pub const NOSE_TIP: usize = 30;

    pub const EYE_LEFT: RangeInclusive<usize> = 36..=41;
    pub const EYE_RIGHT: RangeInclusive<usize> = 42..=47;
    pub const EYE_LEFT_OUTER: usize = 36;
    pub const EYE_LEFT_INNER: usize = 39;
    pub const EYE_RIGHT_INNER: usize = 42;
    pub const EYE_RIGHT_OUTER: usize = 45;

    /// Top of the upper lip, outer contour.
    pub const LIP_TOP: usize = 51;
    /// Bottom of the upper lip, inner contour.
    pub const LIP_UPPER_INNER: usize = 62;
    /// Bottom of the lower lip, outer contour.
    pub const LIP_BOTTOM: usize = 57;
}

/// A 2D point in image coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Exactly 68 landmarks in the fixed anatomical order.
///
/// Only constructible through [`LandmarkSet::new`], so every set that reaches
/// the calculators has the full layout and finite coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Result<Self, AnalysisError> {
        if points.len() != LANDMARK_COUNT {
            return Err(AnalysisError::MalformedLandmarks(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(AnalysisError::MalformedLandmarks(format!(
                "landmark {i} has a non-finite coordinate"
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Centroid of a contiguous landmark range.
    pub fn centroid(&self, range: std::ops::RangeInclusive<usize>) -> Point {
        let slice = &self.points[range];
        let n = slice.len() as f64;
        let (sx, sy) = slice
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

impl TryFrom<Vec<Point>> for LandmarkSet {
    type Error = AnalysisError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

/// Declared gender of the person being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("male"),
            Gender::Female => f.write_str("female"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender: {0:?} (expected male or female)")]
pub struct ParseGenderError(String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "man" | "homme" => Ok(Gender::Male),
            "female" | "f" | "woman" | "femme" => Ok(Gender::Female),
            _ => Err(ParseGenderError(s.to_string())),
        }
    }
}

/// Output of an external landmark detector for a single face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub landmarks: Vec<Point>,
    /// Detector confidence in [0, 1].
    pub confidence: f64,
}
