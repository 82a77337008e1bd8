use serde_json::Value;

pub const PROBABILITIES_FIELD: &str = "Probabilities";
pub const PREDICTED_CLASS_FIELD: &str = "Predicted_Class";

/// One model's entry from the predict response, after schema checking.
/// Fields the service left out or sent in the wrong shape are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawModelResult {
    pub probabilities: Option<Vec<f64>>,
    pub predicted_class: Option<String>,
}

impl RawModelResult {
    pub fn new(probabilities: Vec<f64>, predicted_class: impl Into<String>) -> Self {
        Self {
            probabilities: Some(probabilities),
            predicted_class: Some(predicted_class.into()),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Never fails: anything that is not a list of numbers or a non-empty
    /// string is dropped to `None`.
    pub fn from_value(value: &Value) -> Self {
        let probabilities = value
            .get(PROBABILITIES_FIELD)
            .and_then(Value::as_array)
            .and_then(|items| items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>());

        let predicted_class = value
            .get(PREDICTED_CLASS_FIELD)
            .and_then(Value::as_str)
            .filter(|class| !class.is_empty())
            .map(str::to_string);

        Self {
            probabilities,
            predicted_class,
        }
    }
}
