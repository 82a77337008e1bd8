use crate::error::ValidationError;
use crate::pipeline::orchestration::presentation::PresentationSnapshot;
use crate::pipeline::services::ensemble_view;
use crate::pipeline::types::{ImageFile, NormalizedPrediction, Submission};

pub const SUCCESS_MESSAGE: &str = "Prediction received";
pub const FAILURE_MESSAGE: &str = "Failed to upload and predict";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestOutcome {
    #[default]
    Idle,
    InFlight,
    Succeeded(Vec<NormalizedPrediction>),
    Failed(String),
}

/// Everything the orchestrator remembers between submissions. Transitions
/// consume the state and hand back the next one.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    selected_file: Option<ImageFile>,
    use_ensemble: bool,
    ensemble_requested: bool,
    outcome: RequestOutcome,
    message: String,
}

impl SessionState {
    pub fn new(use_ensemble: bool) -> Self {
        Self {
            use_ensemble,
            ..Self::default()
        }
    }

    pub fn with_file(mut self, file: ImageFile) -> Self {
        self.selected_file = Some(file);
        self
    }

    pub fn with_ensemble(mut self, use_ensemble: bool) -> Self {
        self.use_ensemble = use_ensemble;
        self
    }

    /// Decides whether a submit is allowed without changing anything.
    pub fn prepare_submission(&self) -> Result<Submission, ValidationError> {
        if self.is_loading() {
            return Err(ValidationError::SubmissionInFlight);
        }
        let file = self
            .selected_file
            .as_ref()
            .ok_or(ValidationError::NoFileSelected)?;
        Ok(Submission::new(file.clone(), self.use_ensemble))
    }

    // A rejected submit only changes the message; the outcome stays put.
    pub fn reject(mut self, error: &ValidationError) -> Self {
        self.message = error.to_string();
        self
    }

    pub fn start(mut self, submission: &Submission) -> Self {
        self.ensemble_requested = submission.use_ensemble;
        self.outcome = RequestOutcome::InFlight;
        self.message.clear();
        self
    }

    pub fn succeed(mut self, predictions: Vec<NormalizedPrediction>) -> Self {
        self.outcome = RequestOutcome::Succeeded(predictions);
        self.message = SUCCESS_MESSAGE.to_string();
        self
    }

    /// Previous predictions are dropped on failure.
    pub fn fail(mut self) -> Self {
        self.outcome = RequestOutcome::Failed(FAILURE_MESSAGE.to_string());
        self.message = FAILURE_MESSAGE.to_string();
        self
    }

    pub fn outcome(&self) -> &RequestOutcome {
        &self.outcome
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn selected_file(&self) -> Option<&ImageFile> {
        self.selected_file.as_ref()
    }

    pub fn use_ensemble(&self) -> bool {
        self.use_ensemble
    }

    pub fn is_loading(&self) -> bool {
        self.outcome == RequestOutcome::InFlight
    }

    pub fn predictions(&self) -> &[NormalizedPrediction] {
        match &self.outcome {
            RequestOutcome::Succeeded(predictions) => predictions.as_slice(),
            _ => &[],
        }
    }

    pub fn snapshot(&self) -> PresentationSnapshot {
        let predictions = self.predictions();
        PresentationSnapshot {
            message: self.message.clone(),
            predictions: predictions.to_vec(),
            loading: self.is_loading(),
            ensemble: ensemble_view(predictions, self.ensemble_requested),
        }
    }
}
