use tracing::warn;

use crate::pipeline::types::{
    ClassRegistry, ModelLabel, NormalizedPrediction, RawModelResult, WinningClass,
    DIAGNOSTIC_CLASSES, ENSEMBLE_LABEL, MODEL_NOT_AVAILABLE,
};

/// Turns whatever the service sent per model into uniform records.
/// Malformed entries degrade to "Model not available", they never fail.
#[derive(Debug, Clone, Copy)]
pub struct ResultNormalizer {
    registry: &'static ClassRegistry,
}

impl ResultNormalizer {
    pub fn new(registry: &'static ClassRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'static ClassRegistry {
        self.registry
    }

    pub fn normalize(&self, raw_results: &[RawModelResult]) -> Vec<NormalizedPrediction> {
        raw_results
            .iter()
            .enumerate()
            .map(|(index, raw)| self.normalize_entry(index, raw))
            .collect()
    }

    fn normalize_entry(&self, index: usize, raw: &RawModelResult) -> NormalizedPrediction {
        let probabilities = raw.probabilities.clone().unwrap_or_default();
        let predicted_class = raw
            .predicted_class
            .clone()
            .unwrap_or_else(|| MODEL_NOT_AVAILABLE.to_string());

        // The service marks its aggregate record through the class field.
        let model = if predicted_class == ENSEMBLE_LABEL {
            ModelLabel::Ensemble
        } else {
            ModelLabel::Model(index + 1)
        };

        if !probabilities.is_empty() && probabilities.len() != self.registry.class_count() {
            warn!(
                "{} returned {} probabilities for {} known classes",
                model,
                probabilities.len(),
                self.registry.class_count()
            );
        }

        let winning_class = self.winning_class(&predicted_class, &probabilities);

        NormalizedPrediction {
            model,
            predicted_class,
            probabilities,
            winning_class,
        }
    }

    pub fn winning_class(&self, predicted_class: &str, probabilities: &[f64]) -> WinningClass {
        if predicted_class == MODEL_NOT_AVAILABLE {
            return WinningClass::NotAvailable;
        }
        match first_max_index(probabilities) {
            None => WinningClass::NotAvailable,
            Some(index) => self
                .registry
                .label(index)
                .map(WinningClass::Class)
                .unwrap_or(WinningClass::Unrecognized),
        }
    }
}

impl Default for ResultNormalizer {
    fn default() -> Self {
        Self::new(&DIAGNOSTIC_CLASSES)
    }
}

/// Index of the first occurrence of the largest value.
pub fn first_max_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
