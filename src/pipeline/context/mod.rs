pub mod metrics;
pub mod state;
pub mod submission_context;

pub use metrics::StageMetrics;
pub use state::{PredictedState, SelectedState, SubmissionState, UploadedState};
pub use submission_context::SubmissionContext;
