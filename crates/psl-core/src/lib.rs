//! psl-core: facial landmark scoring and advice engine.
//!
//! Turns a 68-point landmark set into seven geometric sub-scores, a composite
//! 1.0–10.0 score with an achievable "potential", a named band, and a ranked
//! list of recommendations. Pure and synchronous: no I/O, no shared state.

pub mod advice;
pub mod analysis;
pub mod band;
pub mod calibration;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod geometry;
pub mod metrics;
pub mod score;
pub mod types;

pub use advice::{displayable, generate_advice, AdviceItem, Difficulty};
pub use analysis::{analyze, analyze_detection, analyze_with, AnalysisError, LandmarkDetector, Report};
pub use band::{classify, Band, BANDS};
pub use calibration::{validate_calibration, CalibrationError};
pub use score::{Metric, ScoreProfile, SubScores};
pub use types::{Detection, Gender, LandmarkSet, Point, LANDMARK_COUNT};
