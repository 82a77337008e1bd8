use crate::pipeline::types::{RawModelResult, StorageReference};

// Markers to track how far a submission has travelled through the remote calls
pub struct SelectedState;
pub struct UploadedState {
    pub(super) storage_reference: StorageReference,
}
pub struct PredictedState {
    pub(super) storage_reference: StorageReference,
    pub(super) models: Vec<RawModelResult>,
}

pub trait SubmissionState: 'static {
    fn state_name() -> &'static str;
}

impl SubmissionState for SelectedState {
    fn state_name() -> &'static str {
        "Selected"
    }
}

impl SubmissionState for UploadedState {
    fn state_name() -> &'static str {
        "Uploaded"
    }
}

impl SubmissionState for PredictedState {
    fn state_name() -> &'static str {
        "Predicted"
    }
}
