//! Startup checks for the engine's static tables.
//!
//! Violations are programming errors, not per-request failures: callers run
//! [`validate_calibration`] once at process start and abort on error.

use thiserror::Error;

use crate::advice::{Guard, Rule, RULES};
use crate::band::{tenths, Band, BANDS};
use crate::geometry::round1;
use crate::score::{Metric, MAX_SCORE, MIN_SCORE};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("aggregation weights sum to {0}, expected 1.0")]
    WeightSum(f64),
    #[error("band table is empty")]
    NoBands,
    #[error("band {index} ({label}) has min {min} above max {max}")]
    InvertedBand {
        index: usize,
        label: &'static str,
        min: f64,
        max: f64,
    },
    #[error("band {index} ({label}) bound {value} is not on the one-decimal grid")]
    OffGrid {
        index: usize,
        label: &'static str,
        value: f64,
    },
    #[error("band table starts at {0}, expected 1.0")]
    BadLowerBound(f64),
    #[error("band table ends at {0}, expected 10.0")]
    BadUpperBound(f64),
    #[error("gap or overlap between band {index} (max {max}) and band {} (min {next_min})", .index + 1)]
    NotContiguous { index: usize, max: f64, next_min: f64 },
    #[error("advice rule {index} is invalid: {reason}")]
    BadRule { index: usize, reason: &'static str },
}

/// Check weights, bands and advice rules.
pub fn validate_calibration() -> Result<(), CalibrationError> {
    validate_weights()?;
    validate_bands(&BANDS)?;
    validate_rules(&RULES)?;
    tracing::debug!(bands = BANDS.len(), rules = RULES.len(), "calibration tables valid");
    Ok(())
}

pub fn validate_weights() -> Result<(), CalibrationError> {
    let sum: f64 = Metric::ALL.iter().map(|m| m.weight()).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(CalibrationError::WeightSum(sum));
    }
    Ok(())
}

/// Bands must cover [1.0, 10.0] on the one-decimal grid with no gaps or
/// overlaps: every bound is a multiple of 0.1 and each band starts exactly
/// 0.1 after the previous one ends.
pub fn validate_bands(bands: &[Band]) -> Result<(), CalibrationError> {
    let (first, last) = match (bands.first(), bands.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(CalibrationError::NoBands),
    };
    for (index, band) in bands.iter().enumerate() {
        if let Some(&value) = [band.min, band.max].iter().find(|&&v| round1(v) != v) {
            return Err(CalibrationError::OffGrid {
                index,
                label: band.label,
                value,
            });
        }
    }
    if tenths(first.min) != tenths(MIN_SCORE) {
        return Err(CalibrationError::BadLowerBound(first.min));
    }
    if tenths(last.max) != tenths(MAX_SCORE) {
        return Err(CalibrationError::BadUpperBound(last.max));
    }
    for (index, band) in bands.iter().enumerate() {
        if tenths(band.min) > tenths(band.max) {
            return Err(CalibrationError::InvertedBand {
                index,
                label: band.label,
                min: band.min,
                max: band.max,
            });
        }
    }
    for (index, pair) in bands.windows(2).enumerate() {
        if tenths(pair[1].min) != tenths(pair[0].max) + 1 {
            return Err(CalibrationError::NotContiguous {
                index,
                max: pair[0].max,
                next_min: pair[1].min,
            });
        }
    }
    Ok(())
}

pub fn validate_rules(rules: &[Rule]) -> Result<(), CalibrationError> {
    for (index, rule) in rules.iter().enumerate() {
        let t = &rule.template;
        if t.priority == 0 {
            return Err(CalibrationError::BadRule {
                index,
                reason: "priority must be at least 1",
            });
        }
        if t.title.trim().is_empty() {
            return Err(CalibrationError::BadRule {
                index,
                reason: "empty title",
            });
        }
        if let Some(target) = t.restricted_to {
            if rule.guard != Guard::GenderIs(target) {
                return Err(CalibrationError::BadRule {
                    index,
                    reason: "restricted item must be guarded by its target gender",
                });
            }
        }
    }
    Ok(())
}
