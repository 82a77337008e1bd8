use serde::Serialize;

use crate::pipeline::types::NormalizedPrediction;

/// The ensemble record, flattened for its own block. Probabilities stay a
/// single joined string rather than a per-class breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleView {
    pub model: String,
    pub predicted_class: String,
    pub probabilities: String,
    pub winning_class: String,
}

impl From<&NormalizedPrediction> for EnsembleView {
    fn from(prediction: &NormalizedPrediction) -> Self {
        Self {
            model: prediction.model.to_string(),
            predicted_class: prediction.predicted_class.clone(),
            probabilities: join_probabilities(&prediction.probabilities),
            winning_class: prediction.winning_class.to_string(),
        }
    }
}

pub fn select_ensemble(predictions: &[NormalizedPrediction]) -> Option<&NormalizedPrediction> {
    predictions.iter().find(|prediction| prediction.is_ensemble())
}

/// Only produced when ensemble mode was requested and the service sent one.
pub fn ensemble_view(
    predictions: &[NormalizedPrediction],
    ensemble_requested: bool,
) -> Option<EnsembleView> {
    if !ensemble_requested {
        return None;
    }
    select_ensemble(predictions).map(EnsembleView::from)
}

pub fn join_probabilities(probabilities: &[f64]) -> String {
    probabilities
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
