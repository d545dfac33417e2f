//! Analysis boundary: landmarks in, score profile, band and advice out.
//!
//! The landmark detector is an injected collaborator ([`LandmarkDetector`]);
//! the engine itself never touches images.

use serde::Serialize;
use thiserror::Error;

use crate::advice::{generate_advice, AdviceItem};
use crate::band::{classify, Band};
use crate::metrics::{compute_all, Face};
use crate::score::ScoreProfile;
use crate::types::{Detection, Gender, LandmarkSet};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no face detected: a clear, front-facing photo is required")]
    MissingFace,
    #[error("malformed landmarks: {0}")]
    MalformedLandmarks(String),
    #[error("landmark detector failed: {0}")]
    Detector(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// External landmark detector.
///
/// `Ok(None)` means the input was processed but contains no face.
pub trait LandmarkDetector {
    type Input: ?Sized;
    type Error: std::error::Error + Send + Sync + 'static;

    fn detect(&self, input: &Self::Input) -> Result<Option<Detection>, Self::Error>;
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub gender: Gender,
    pub age: u32,
    pub scores: ScoreProfile,
    pub band: &'static Band,
    /// Full advice list, restricted items included.
    pub advice: Vec<AdviceItem>,
}

/// Score a 68-point landmark set.
///
/// `gender` and `age` are only logged here; the geometry does not depend on
/// them. They drive [`generate_advice`].
pub fn analyze(
    landmarks: &LandmarkSet,
    confidence: f64,
    gender: Gender,
    age: u32,
) -> Result<ScoreProfile, AnalysisError> {
    let face = Face::new(landmarks, confidence).map_err(|e| {
        tracing::warn!(error = %e, "rejecting landmark set");
        e
    })?;
    let sub = compute_all(&face).map_err(|e| {
        tracing::warn!(error = %e, "sub-score computation failed");
        e
    })?;
    let profile = ScoreProfile::from_sub_scores(sub);
    tracing::info!(
        %gender,
        age,
        raw = profile.raw,
        overall = profile.overall,
        potential = profile.potential,
        "analysis complete"
    );
    Ok(profile)
}

/// Validate a raw detection and run the full pipeline on it.
pub fn analyze_detection(
    detection: Option<Detection>,
    gender: Gender,
    age: u32,
) -> Result<Report, AnalysisError> {
    let detection = detection.ok_or(AnalysisError::MissingFace)?;
    let landmarks = LandmarkSet::new(detection.landmarks).map_err(|e| {
        tracing::warn!(error = %e, "rejecting detector output");
        e
    })?;
    let scores = analyze(&landmarks, detection.confidence, gender, age)?;
    let band = classify(scores.overall);
    let advice = generate_advice(&scores, gender, age);
    tracing::info!(band = band.label, advice = advice.len(), "report ready");
    Ok(Report {
        gender,
        age,
        scores,
        band,
        advice,
    })
}

/// Run `detector` on `input`, then analyze the detected face.
pub fn analyze_with<D: LandmarkDetector>(
    detector: &D,
    input: &D::Input,
    gender: Gender,
    age: u32,
) -> Result<Report, AnalysisError> {
    let detection = detector
        .detect(input)
        .map_err(|e| AnalysisError::Detector(Box::new(e)))?;
    if detection.is_none() {
        tracing::info!("detector found no face");
    }
    analyze_detection(detection, gender, age)
}
