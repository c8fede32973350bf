//! Class labels and classifier predictions
//!
//! A frame from the classifier is a list of `{label, probability}` entries.
//! Only the top-scoring entry is passed on to the stabilizer.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Opaque name of a recognized gesture class
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Create a label from anything string-like
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the label name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClassLabel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassLabel {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for ClassLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One classifier guess: a label and its probability
///
/// The probability is expected in `[0, 1]` but is not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub label: ClassLabel,
    pub probability: f32,
}

impl Observation {
    pub fn new(label: impl Into<ClassLabel>, probability: f32) -> Self {
        Self {
            label: label.into(),
            probability,
        }
    }
}

/// An entry of the classifier's per-frame output list
pub type Prediction = Observation;

/// Pick the highest-probability prediction of a frame.
///
/// Ties go to the later entry. Returns `None` for an empty frame.
pub fn top_prediction(predictions: &[Prediction]) -> Option<&Prediction> {
    predictions
        .iter()
        .reduce(|best, next| if best.probability > next.probability { best } else { next })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_prediction_picks_highest() {
        let frame = vec![
            Prediction::new("Start", 0.2),
            Prediction::new("Dance", 0.7),
            Prediction::new("Neutral", 0.1),
        ];
        let top = top_prediction(&frame).unwrap();
        assert_eq!(top.label.as_str(), "Dance");
    }

    #[test]
    fn test_top_prediction_tie_goes_to_later() {
        let frame = vec![Prediction::new("Start", 0.5), Prediction::new("Dance", 0.5)];
        assert_eq!(top_prediction(&frame).unwrap().label.as_str(), "Dance");
    }

    #[test]
    fn test_top_prediction_empty_frame() {
        assert!(top_prediction(&[]).is_none());
    }

    #[test]
    fn test_prediction_deserialization() {
        let json = r#"[{"label":"High_Five","probability":0.93}]"#;
        let frame: Vec<Prediction> = serde_json::from_str(json).unwrap();
        assert_eq!(frame[0].label, ClassLabel::from("High_Five"));
        assert!((frame[0].probability - 0.93).abs() < f32::EPSILON);
    }
}
