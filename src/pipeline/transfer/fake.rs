use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::RemoteCallError;
use crate::pipeline::transfer::transport::InferenceTransport;
use crate::pipeline::transfer::wire::PredictRequest;
use crate::pipeline::types::{ImageFile, RawModelResult, StorageReference};

#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    Upload(String),
    Predict(PredictRequest),
}

pub enum FakeUpload {
    Reference(&'static str),
    MissingReference,
    Fail,
}

pub enum FakePredict {
    Models(Vec<RawModelResult>),
    Fail,
}

/// Scripted stand-in for the inference service that records every call.
pub struct FakeTransport {
    upload: FakeUpload,
    predict: FakePredict,
    upload_delay: Option<Duration>,
    predict_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<FakeCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            upload: FakeUpload::Reference("src/upload/image.png"),
            predict: FakePredict::Models(Vec::new()),
            upload_delay: None,
            predict_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_upload(mut self, upload: FakeUpload) -> Self {
        self.upload = upload;
        self
    }

    pub fn with_predict(mut self, predict: FakePredict) -> Self {
        self.predict = predict;
        self
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    /// Predict does not answer until the gate is notified.
    pub fn with_predict_gate(mut self, gate: Arc<Notify>) -> Self {
        self.predict_gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FakeCall::Upload(file_name) => Some(file_name),
                FakeCall::Predict(_) => None,
            })
            .collect()
    }

    fn record(&self, call: FakeCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl InferenceTransport for FakeTransport {
    async fn upload(&self, image: &ImageFile) -> Result<StorageReference, RemoteCallError> {
        self.record(FakeCall::Upload(image.file_name().to_string()));
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.upload {
            FakeUpload::Reference(reference) => Ok(StorageReference::new(*reference)),
            FakeUpload::MissingReference => Err(RemoteCallError::MissingField("file_path")),
            FakeUpload::Fail => Err(RemoteCallError::Transport("connection refused".to_string())),
        }
    }

    async fn predict(
        &self,
        request: &PredictRequest,
    ) -> Result<Vec<RawModelResult>, RemoteCallError> {
        self.record(FakeCall::Predict(request.clone()));
        if let Some(gate) = &self.predict_gate {
            gate.notified().await;
        }
        match &self.predict {
            FakePredict::Models(models) => Ok(models.clone()),
            FakePredict::Fail => Err(RemoteCallError::Status { status: 500 }),
        }
    }
}
