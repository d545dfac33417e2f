pub use psl_core::fixtures::{detection, symmetric_points as frontal_face};
