pub mod client;
pub mod service;
pub mod transport;
pub mod wire;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{TransferClient, TransferClientBuilder};
pub use service::{PredictService, UploadService};
pub use transport::{HttpTransport, InferenceTransport};
pub use wire::PredictRequest;
