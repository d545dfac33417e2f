//! Landmark fixtures shared by unit and integration tests.
//!
//! Enabled for this crate's own tests and, for dependants and the `tests/`
//! directory, through the `test-fixtures` feature.

use crate::types::{Detection, LandmarkSet, Point, LANDMARK_COUNT};

/// A frontal, perfectly symmetric face, 120px wide, with level eyes.
///
/// Proportions are chosen so that eyes, lips and the middle/lower third
/// ratio sit exactly on their ideals.
pub fn symmetric_points() -> Vec<Point> {
    let mut pts = vec![Point::new(0.0, 0.0); LANDMARK_COUNT];

    // Jaw: semicircle of radius 60 around (100, 100), mirrored about x = 100.
    for i in 0..=8 {
        let t = std::f64::consts::PI * i as f64 / 16.0;
        let p = Point::new(100.0 - 60.0 * t.cos(), 100.0 + 60.0 * t.sin());
        pts[i] = p;
        pts[16 - i] = Point::new(200.0 - p.x, p.y);
    }
    pts[8] = Point::new(100.0, 160.0);

    for (k, i) in (17..=21).enumerate() {
        let x = 55.0 + 7.5 * k as f64;
        pts[i] = Point::new(x, 80.0);
        pts[26 - k] = Point::new(200.0 - x, 80.0);
    }

    for (k, i) in (27..=30).enumerate() {
        pts[i] = Point::new(100.0, 90.0 + 10.0 * k as f64);
    }
    let nose_base = [(90.0, 125.0), (95.0, 126.0), (100.0, 127.0), (105.0, 126.0), (110.0, 125.0)];
    for (k, &(x, y)) in nose_base.iter().enumerate() {
        pts[31 + k] = Point::new(x, y);
    }

    let left_eye = [(64.0, 95.0), (70.0, 91.0), (78.0, 91.0), (88.0, 95.0), (78.0, 98.0), (70.0, 98.0)];
    for (k, &(x, y)) in left_eye.iter().enumerate() {
        pts[36 + k] = Point::new(x, y);
    }
    // Mirror: 42 is the inner corner (mirror of 39), 45 the outer (mirror of 36).
    let mirror = [39, 38, 37, 36, 41, 40];
    for (k, &src) in mirror.iter().enumerate() {
        pts[42 + k] = Point::new(200.0 - pts[src].x, pts[src].y);
    }

    let mouth = [
        (82.0, 138.0), (88.0, 134.0), (94.0, 132.0), (100.0, 133.0), (106.0, 132.0),
        (112.0, 134.0), (118.0, 138.0), (112.0, 141.0), (106.0, 142.5), (100.0, 143.0),
        (94.0, 142.5), (88.0, 141.0),
        (85.0, 138.0), (94.0, 137.0), (100.0, 137.0), (106.0, 137.0), (115.0, 138.0),
        (106.0, 138.0), (100.0, 138.0), (94.0, 138.0),
    ];
    for (k, &(x, y)) in mouth.iter().enumerate() {
        pts[48 + k] = Point::new(x, y);
    }

    pts
}

pub fn symmetric_face() -> LandmarkSet {
    LandmarkSet::new(symmetric_points()).unwrap()
}

/// [`symmetric_points`] as a detector result.
pub fn detection(confidence: f64) -> Detection {
    Detection {
        landmarks: symmetric_points(),
        confidence,
    }
}
