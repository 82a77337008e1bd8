use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::pipeline::context::metrics::StageMetrics;
use crate::pipeline::context::state::{
    PredictedState, SelectedState, SubmissionState, UploadedState,
};
use crate::pipeline::types::{RawModelResult, StorageReference, Submission};

// SubmissionContext with compile-time stage tracking: predict can only be
// reached through an uploaded context, which carries the storage reference.
pub struct SubmissionContext<S> {
    submission: Arc<Submission>,
    metrics: StageMetrics,
    stage_start: Instant,
    state: S,
}

impl<S: SubmissionState> SubmissionContext<S> {
    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub(crate) fn submission_handle(&self) -> Arc<Submission> {
        Arc::clone(&self.submission)
    }

    pub fn metrics(&self) -> &StageMetrics {
        &self.metrics
    }

    pub fn stage_elapsed(&self) -> Duration {
        self.stage_start.elapsed()
    }

    pub fn stage_name(&self) -> &'static str {
        S::state_name()
    }
}

// The stage markers carry no useful Debug output of their own.
impl<S: SubmissionState> fmt::Debug for SubmissionContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionContext")
            .field("stage", &S::state_name())
            .field("submission", &self.submission.id)
            .field("file_name", &self.submission.image.file_name())
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl SubmissionContext<SelectedState> {
    pub fn new(submission: Submission) -> Self {
        Self {
            submission: Arc::new(submission),
            metrics: StageMetrics::new(),
            stage_start: Instant::now(),
            state: SelectedState,
        }
    }

    pub fn into_uploaded(
        mut self,
        storage_reference: StorageReference,
    ) -> SubmissionContext<UploadedState> {
        self.metrics.record_upload_duration(self.stage_elapsed());
        SubmissionContext::<UploadedState> {
            submission: self.submission,
            metrics: self.metrics,
            stage_start: Instant::now(),
            state: UploadedState { storage_reference },
        }
    }
}

impl SubmissionContext<UploadedState> {
    pub fn storage_reference(&self) -> &StorageReference {
        &self.state.storage_reference
    }

    pub fn into_predicted(
        mut self,
        models: Vec<RawModelResult>,
    ) -> SubmissionContext<PredictedState> {
        self.metrics.record_predict_duration(self.stage_elapsed());
        SubmissionContext::<PredictedState> {
            submission: self.submission,
            metrics: self.metrics,
            stage_start: Instant::now(),
            state: PredictedState {
                storage_reference: self.state.storage_reference,
                models,
            },
        }
    }
}

impl SubmissionContext<PredictedState> {
    pub fn storage_reference(&self) -> &StorageReference {
        &self.state.storage_reference
    }

    pub fn models(&self) -> &[RawModelResult] {
        &self.state.models
    }

    pub fn into_models(self) -> Vec<RawModelResult> {
        self.state.models
    }
}
