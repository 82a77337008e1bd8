use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::Configuration;
use crate::error::{AppError, ValidationError};
use crate::pipeline::orchestration::presentation::PresentationSnapshot;
use crate::pipeline::orchestration::session_state::SessionState;
use crate::pipeline::services::ResultNormalizer;
use crate::pipeline::transfer::{HttpTransport, InferenceTransport, TransferClient};
use crate::pipeline::types::{ClassRegistry, ImageFile, DIAGNOSTIC_CLASSES};

/// Drives one image through upload, predict and normalization, and owns
/// the only mutable state involved.
pub struct PredictionOrchestrator {
    transfer: TransferClient,
    normalizer: ResultNormalizer,
    state: SessionState,
    snapshot_tx: watch::Sender<PresentationSnapshot>,
}

impl PredictionOrchestrator {
    pub(crate) fn new(
        transfer: TransferClient,
        normalizer: ResultNormalizer,
        use_ensemble: bool,
    ) -> Self {
        let state = SessionState::new(use_ensemble);
        let (snapshot_tx, _) = watch::channel(state.snapshot());
        Self {
            transfer,
            normalizer,
            state,
            snapshot_tx,
        }
    }

    pub fn builder(configuration: Configuration) -> PredictionOrchestratorBuilder {
        PredictionOrchestratorBuilder::new(configuration)
    }

    /// Receives a snapshot on every state transition, including the
    /// in-flight one.
    pub fn subscribe(&self) -> watch::Receiver<PresentationSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> PresentationSnapshot {
        self.state.snapshot()
    }

    pub fn select_file(&mut self, file: ImageFile) {
        debug!("Selected {} ({})", file.file_name(), file.mime_type());
        self.transition(|state| state.with_file(file));
    }

    /// Reads the image at `path` and selects it. A missing, unreadable or
    /// empty file is reported through the message like any other
    /// validation failure.
    pub async fn select_path(&mut self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let path = path.as_ref();
        match ImageFile::from_path(path).await {
            Ok(file) => {
                self.select_file(file);
                Ok(())
            }
            Err(e) => {
                warn!("Could not select {}: {}", path.display(), e);
                let rejection = match e {
                    AppError::Validation(validation) => validation,
                    _ => ValidationError::UnreadableFile,
                };
                self.transition(|state| state.reject(&rejection));
                Err(rejection)
            }
        }
    }

    pub fn set_use_ensemble(&mut self, use_ensemble: bool) {
        self.transition(|state| state.with_ensemble(use_ensemble));
    }

    pub async fn submit(&mut self) -> PresentationSnapshot {
        let submission = match self.state.prepare_submission() {
            Ok(submission) => submission,
            Err(e) => {
                warn!("Submission rejected: {}", e);
                self.transition(|state| state.reject(&e));
                return self.snapshot();
            }
        };

        let submission_id = submission.id;
        info!(
            "Submitting {} ({} bytes) as {} at {}, ensemble: {}",
            submission.image.file_name(),
            submission.image.byte_len(),
            submission_id,
            submission.submitted_at.to_rfc3339(),
            submission.use_ensemble
        );
        self.transition(|state| state.start(&submission));

        // Leaves InFlight even if this future is dropped before it completes.
        let mut in_flight = InFlightGuard {
            state: &mut self.state,
            snapshot_tx: &self.snapshot_tx,
        };

        match self.transfer.submit(submission).await {
            Ok(context) => {
                let metrics = context.metrics();
                info!(
                    "Submission {} completed (upload {:?}, predict {:?})",
                    submission_id,
                    metrics.upload_duration().unwrap_or_default(),
                    metrics.predict_duration().unwrap_or_default()
                );
                let models = context.into_models();
                let predictions = self.normalizer.normalize(&models);
                if predictions.is_empty() {
                    warn!("Submission {} returned no predictions", submission_id);
                }
                in_flight.apply(|state| state.succeed(predictions));
            }
            Err(e) => {
                error!("Submission {} failed: {}", submission_id, e);
                in_flight.apply(SessionState::fail);
            }
        }
        drop(in_flight);

        self.snapshot()
    }

    fn transition(&mut self, apply: impl FnOnce(SessionState) -> SessionState) {
        publish_transition(&mut self.state, &self.snapshot_tx, apply);
    }
}

fn publish_transition(
    state: &mut SessionState,
    snapshot_tx: &watch::Sender<PresentationSnapshot>,
    apply: impl FnOnce(SessionState) -> SessionState,
) {
    let current = std::mem::take(state);
    *state = apply(current);
    snapshot_tx.send_replace(state.snapshot());
}

/// Fails a submission that is still InFlight when the guard goes away,
/// which only happens when the submit future was dropped early.
struct InFlightGuard<'a> {
    state: &'a mut SessionState,
    snapshot_tx: &'a watch::Sender<PresentationSnapshot>,
}

impl InFlightGuard<'_> {
    fn apply(&mut self, apply: impl FnOnce(SessionState) -> SessionState) {
        publish_transition(self.state, self.snapshot_tx, apply);
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.state.is_loading() {
            warn!("Submission abandoned before completion");
            self.apply(SessionState::fail);
        }
    }
}

pub struct PredictionOrchestratorBuilder {
    configuration: Configuration,
    request_timeout: Option<Duration>,
    transport: Option<Arc<dyn InferenceTransport>>,
    registry: &'static ClassRegistry,
}

impl PredictionOrchestratorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            request_timeout: configuration.request_timeout(),
            configuration,
            transport: None,
            registry: &DIAGNOSTIC_CLASSES,
        }
    }

    // Sets the service base URL, this will override the configuration.
    pub fn service_url(mut self, service_url: impl Into<String>) -> Self {
        self.configuration.service_url = service_url.into();
        self
    }

    // Sets the per-call timeout, this will override the configuration.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn use_ensemble(mut self, use_ensemble: bool) -> Self {
        self.configuration.use_ensemble = use_ensemble;
        self
    }

    // Replaces the HTTP transport, mostly for tests.
    pub fn transport(mut self, transport: Arc<dyn InferenceTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn registry(mut self, registry: &'static ClassRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> Result<PredictionOrchestrator, AppError> {
        self.configuration.validate()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.configuration)?),
        };
        let transfer = TransferClient::builder(transport)
            .timeout(self.request_timeout)
            .build();
        Ok(PredictionOrchestrator::new(
            transfer,
            ResultNormalizer::new(self.registry),
            self.configuration.use_ensemble,
        ))
    }
}
