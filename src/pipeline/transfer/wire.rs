use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::RemoteCallError;
use crate::pipeline::types::{RawModelResult, StorageReference};

pub const IMAGE_FIELD: &str = "image";
pub const FILE_PATH_FIELD: &str = "file_path";
pub const MODELS_FIELD: &str = "models";

/// Body of the predict call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub file_path: StorageReference,
    // The service only switches to ensemble mode when this is present and true.
    #[serde(rename = "useEnsemble", skip_serializing_if = "std::ops::Not::not")]
    pub use_ensemble: bool,
}

impl PredictRequest {
    pub fn new(file_path: StorageReference, use_ensemble: bool) -> Self {
        Self {
            file_path,
            use_ensemble,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file_path: Option<String>,
}

pub fn parse_upload_response(body: &[u8]) -> Result<StorageReference, RemoteCallError> {
    let response: UploadResponse = serde_json::from_slice(body)?;
    response
        .file_path
        .filter(|path| !path.is_empty())
        .map(StorageReference::new)
        .ok_or(RemoteCallError::MissingField(FILE_PATH_FIELD))
}

/// An absent or non-list `models` field is "no predictions", not a failure.
pub fn parse_predict_response(body: &[u8]) -> Result<Vec<RawModelResult>, RemoteCallError> {
    let response: Value = serde_json::from_slice(body)?;
    match response.get(MODELS_FIELD) {
        Some(Value::Array(entries)) => Ok(entries.iter().map(RawModelResult::from_value).collect()),
        Some(other) => {
            warn!("Predict response `models` is not a list ({}), treating as empty", other);
            Ok(Vec::new())
        }
        None => {
            warn!("Predict response has no `models` field, treating as empty");
            Ok(Vec::new())
        }
    }
}
