//! Landmark detector backed by a JSON file written by an external detector.
//!
//! ```json
//! { "confidence": 0.93, "landmarks": [{ "x": 41.2, "y": 88.0 }, ...] }
//! ```
//!
//! `"landmarks": null` (or no `landmarks` key) means no face was found.
//! `confidence` is required whenever landmarks are present.

use psl_core::{Detection, LandmarkDetector, Point};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionFileError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid detection JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("detection has landmarks but no confidence")]
    MissingConfidence,
}

#[derive(Debug, Deserialize)]
struct DetectionFile {
    #[serde(default)]
    landmarks: Option<Vec<Point>>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Reads detector output from disk.
pub struct JsonFileDetector;

impl JsonFileDetector {
    pub fn parse(json: &str) -> Result<Option<Detection>, DetectionFileError> {
        let file: DetectionFile = serde_json::from_str(json)?;
        match (file.landmarks, file.confidence) {
            (None, _) => Ok(None),
            (Some(landmarks), Some(confidence)) => Ok(Some(Detection {
                landmarks,
                confidence,
            })),
            (Some(_), None) => Err(DetectionFileError::MissingConfidence),
        }
    }
}

impl LandmarkDetector for JsonFileDetector {
    type Input = Path;
    type Error = DetectionFileError;

    fn detect(&self, path: &Path) -> Result<Option<Detection>, DetectionFileError> {
        let json = std::fs::read_to_string(path).map_err(|source| DetectionFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let detection = Self::parse(&json)?;
        tracing::debug!(
            path = %path.display(),
            landmarks = detection.as_ref().map(|d| d.landmarks.len()),
            "read detection file"
        );
        Ok(detection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_face() {
        let det = JsonFileDetector::parse(r#"{"confidence":0.8,"landmarks":[{"x":1,"y":2}]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(det.confidence, 0.8);
        assert_eq!(det.landmarks, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_parse_no_face() {
        assert!(JsonFileDetector::parse(r#"{"landmarks":null}"#).unwrap().is_none());
        assert!(JsonFileDetector::parse("{}").unwrap().is_none());
    }

    #[test]
    fn test_parse_requires_confidence() {
        let sample = include_str!("../../../contrib/sample-detection.json");
        let mut value: serde_json::Value = serde_json::from_str(sample).unwrap();
        value.as_object_mut().unwrap().remove("confidence");
        assert!(matches!(
            JsonFileDetector::parse(&value.to_string()),
            Err(DetectionFileError::MissingConfidence)
        ));
        assert!(matches!(
            JsonFileDetector::parse(r#"{"landmarks":[],"confidence":null}"#),
            Err(DetectionFileError::MissingConfidence)
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            JsonFileDetector::parse("not json"),
            Err(DetectionFileError::Json(_))
        ));
    }

    #[test]
    fn test_sample_files() {
        let det = JsonFileDetector::parse(include_str!("../../../contrib/sample-detection.json"))
            .unwrap();
        let report = psl_core::analyze_detection(det, psl_core::Gender::Male, 25).unwrap();
        assert!(report.scores.sub.canthal_tilt > 50.0);
        assert!(report.scores.sub.symmetry < 100.0);

        let none = JsonFileDetector::parse(include_str!("../../../contrib/no-face.json")).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_detect_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"confidence":0.5,"landmarks":[]}}"#).unwrap();
        let det = JsonFileDetector.detect(file.path()).unwrap().unwrap();
        assert!(det.landmarks.is_empty());
    }

    #[test]
    fn test_detect_missing_file() {
        let err = JsonFileDetector
            .detect(Path::new("/nonexistent/face.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/face.json"));
    }
}
