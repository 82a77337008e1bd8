use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Transfer Error: {0}")]
    Transfer(#[from] TransferError),
    #[error("Configuration Error: {0}")]
    Configuration(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to read image {1}: {0}")]
    ReadImage(std::io::Error, String),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

/// Problems caught locally, before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a file first.")]
    NoFileSelected,
    #[error("A submission is already in progress.")]
    SubmissionInFlight,
    #[error("The selected file is empty.")]
    EmptyFile,
    #[error("Could not read the selected file.")]
    UnreadableFile,
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Upload failed: {0}")]
    Upload(RemoteCallError),
    #[error("Prediction failed: {0}")]
    Prediction(RemoteCallError),
}

impl TransferError {
    pub fn cause(&self) -> &RemoteCallError {
        match self {
            TransferError::Upload(cause) | TransferError::Prediction(cause) => cause,
        }
    }
}

// Failure of a single remote call, independent of which stage issued it.
#[derive(Error, Debug)]
pub enum RemoteCallError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service responded with status {status}")]
    Status { status: u16 },
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("Request timed out")]
    TimedOut,
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl RemoteCallError {
    /// Recovers the typed cause from a boxed tower stage error.
    pub fn from_boxed(error: tower::BoxError) -> Self {
        if error.is::<tower::timeout::error::Elapsed>() {
            return RemoteCallError::TimedOut;
        }
        match error.downcast::<RemoteCallError>() {
            Ok(remote) => *remote,
            Err(other) => RemoteCallError::Transport(other.to_string()),
        }
    }
}
