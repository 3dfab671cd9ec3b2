// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! Detections arrive from the inference service as labeled bounding boxes
//! in source-image pixel coordinates.

use serde::Deserialize;

/// A labeled bounding box in source-image pixel space.
///
/// Coordinates are kept exactly as the detector reported them; boxes that
/// fall outside the image are not clamped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Annotation {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
    #[serde(rename = "class_label")]
    pub label: String,
}

impl Annotation {
    /// Create a new annotation from its corners and label.
    #[cfg(test)]
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32, label: impl Into<String>) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{"class_label": "A", "xmin": 12, "ymin": 8, "xmax": 120, "ymax": 96}"#;
        let annotation: Annotation = serde_json::from_str(json).unwrap();

        assert_eq!(annotation, Annotation::new(12.0, 8.0, 120.0, 96.0, "A"));
    }

    #[test]
    fn test_missing_label_is_rejected() {
        let json = r#"{"xmin": 1, "ymin": 2, "xmax": 3, "ymax": 4}"#;
        assert!(serde_json::from_str::<Annotation>(json).is_err());
    }
}
