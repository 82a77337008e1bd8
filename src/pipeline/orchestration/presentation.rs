use indexmap::IndexMap;
use serde::Serialize;

use crate::pipeline::services::EnsembleView;
use crate::pipeline::types::{ClassRegistry, NormalizedPrediction, NOT_AVAILABLE};

/// What the presentation layer gets after every transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresentationSnapshot {
    pub message: String,
    pub predictions: Vec<NormalizedPrediction>,
    pub loading: bool,
    pub ensemble: Option<EnsembleView>,
}

/// Per-class probabilities formatted to two decimals, "N/A" where the model
/// sent nothing for that class.
pub fn probability_breakdown(
    prediction: &NormalizedPrediction,
    registry: &ClassRegistry,
) -> IndexMap<&'static str, String> {
    registry
        .labels()
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let formatted = prediction
                .probability(index)
                .map(|probability| format!("{:.2}", probability))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            (*label, formatted)
        })
        .collect()
}
