pub mod config;
pub mod error;
pub mod pipeline;

pub use config::Configuration;
pub use error::{AppError, RemoteCallError, TransferError, ValidationError};

pub use pipeline::{
    ImageFile, NormalizedPrediction, PredictionOrchestrator, PresentationSnapshot, RequestOutcome,
};
