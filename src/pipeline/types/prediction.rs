use std::fmt;

use serde::Serialize;

pub const MODEL_NOT_AVAILABLE: &str = "Model not available";
pub const ENSEMBLE_LABEL: &str = "Ensemble";
pub const NOT_AVAILABLE: &str = "N/A";
pub const UNRECOGNIZED_CLASS: &str = "Unrecognized class";

/// Identifier of the model that produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelLabel {
    /// 1-indexed position in the service response.
    Model(usize),
    Ensemble,
}

impl fmt::Display for ModelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLabel::Model(number) => write!(f, "Model {}", number),
            ModelLabel::Ensemble => f.write_str(ENSEMBLE_LABEL),
        }
    }
}

impl Serialize for ModelLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinningClass {
    Class(&'static str),
    NotAvailable,
    /// The highest probability sits at an index the registry has no label for.
    Unrecognized,
}

impl fmt::Display for WinningClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinningClass::Class(label) => f.write_str(label),
            WinningClass::NotAvailable => f.write_str(NOT_AVAILABLE),
            WinningClass::Unrecognized => f.write_str(UNRECOGNIZED_CLASS),
        }
    }
}

impl Serialize for WinningClass {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPrediction {
    pub model: ModelLabel,
    pub predicted_class: String,
    pub probabilities: Vec<f64>,
    pub winning_class: WinningClass,
}

impl NormalizedPrediction {
    pub fn is_available(&self) -> bool {
        self.predicted_class != MODEL_NOT_AVAILABLE
    }

    pub fn is_ensemble(&self) -> bool {
        self.model == ModelLabel::Ensemble
    }

    pub fn probability(&self, index: usize) -> Option<f64> {
        self.probabilities.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_render_like_the_service_table() {
        assert_eq!(ModelLabel::Model(2).to_string(), "Model 2");
        assert_eq!(ModelLabel::Ensemble.to_string(), "Ensemble");
        assert_eq!(WinningClass::Class("Normal").to_string(), "Normal");
        assert_eq!(WinningClass::NotAvailable.to_string(), "N/A");
        assert_eq!(WinningClass::Unrecognized.to_string(), "Unrecognized class");
    }

    #[test]
    fn test_serializes_as_display_strings() {
        let prediction = NormalizedPrediction {
            model: ModelLabel::Model(1),
            predicted_class: "Normal".to_string(),
            probabilities: vec![0.9, 0.05, 0.05],
            winning_class: WinningClass::Class("Normal"),
        };
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["model"], "Model 1");
        assert_eq!(json["winning_class"], "Normal");
    }
}
