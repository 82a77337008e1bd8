use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tower::{BoxError, Service};

use crate::pipeline::transfer::transport::InferenceTransport;
use crate::pipeline::transfer::wire::PredictRequest;
use crate::pipeline::types::{RawModelResult, StorageReference, Submission};

/// Stage one: stores the image remotely and yields its storage reference.
#[derive(Clone)]
pub struct UploadService {
    transport: Arc<dyn InferenceTransport>,
}

impl UploadService {
    pub fn new(transport: Arc<dyn InferenceTransport>) -> Self {
        Self { transport }
    }
}

impl Service<Arc<Submission>> for UploadService {
    type Response = StorageReference;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, submission: Arc<Submission>) -> Self::Future {
        let transport = self.transport.clone();
        Box::pin(async move {
            let reference = transport.upload(&submission.image).await?;
            Ok(reference)
        })
    }
}

/// Stage two: asks the service to run its models on a stored image.
#[derive(Clone)]
pub struct PredictService {
    transport: Arc<dyn InferenceTransport>,
}

impl PredictService {
    pub fn new(transport: Arc<dyn InferenceTransport>) -> Self {
        Self { transport }
    }
}

impl Service<PredictRequest> for PredictService {
    type Response = Vec<RawModelResult>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: PredictRequest) -> Self::Future {
        let transport = self.transport.clone();
        Box::pin(async move {
            let models = transport.predict(&request).await?;
            Ok(models)
        })
    }
}
