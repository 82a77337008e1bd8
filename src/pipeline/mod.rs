pub mod context;
pub mod orchestration;
pub mod services;
pub mod transfer;
pub mod types;

pub use orchestration::{PredictionOrchestrator, PresentationSnapshot, RequestOutcome};
pub use services::{EnsembleView, ResultNormalizer};
pub use transfer::{HttpTransport, InferenceTransport, TransferClient};
pub use types::{
    ImageFile, ModelLabel, NormalizedPrediction, RawModelResult, WinningClass, DIAGNOSTIC_CLASSES,
};
