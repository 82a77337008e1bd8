use std::sync::Arc;
use std::time::Duration;

use tower::timeout::TimeoutLayer;
use tower::util::BoxService;
use tower::{BoxError, Service, ServiceBuilder, ServiceExt};
use tracing::debug;

use crate::error::{RemoteCallError, TransferError};
use crate::pipeline::context::{
    PredictedState, SelectedState, SubmissionContext, UploadedState,
};
use crate::pipeline::transfer::service::{PredictService, UploadService};
use crate::pipeline::transfer::transport::InferenceTransport;
use crate::pipeline::transfer::wire::PredictRequest;
use crate::pipeline::types::{RawModelResult, StorageReference, Submission};

/// Runs the upload and predict calls strictly one after the other.
pub struct TransferClient {
    upload: BoxService<Arc<Submission>, StorageReference, BoxError>,
    predict: BoxService<PredictRequest, Vec<RawModelResult>, BoxError>,
}

impl TransferClient {
    pub fn builder(transport: Arc<dyn InferenceTransport>) -> TransferClientBuilder {
        TransferClientBuilder {
            transport,
            timeout: None,
        }
    }

    pub async fn submit(
        &mut self,
        submission: Submission,
    ) -> Result<SubmissionContext<PredictedState>, TransferError> {
        let context = SubmissionContext::new(submission);
        let uploaded = self.upload(context).await?;
        self.predict(uploaded).await
    }

    async fn upload(
        &mut self,
        context: SubmissionContext<SelectedState>,
    ) -> Result<SubmissionContext<UploadedState>, TransferError> {
        let reference = self
            .upload
            .ready()
            .await
            .map_err(|e| TransferError::Upload(RemoteCallError::from_boxed(e)))?
            .call(context.submission_handle())
            .await
            .map_err(|e| TransferError::Upload(RemoteCallError::from_boxed(e)))?;

        debug!(
            "Submission {} uploaded as {} after {:?}",
            context.submission().id,
            reference,
            context.stage_elapsed()
        );
        Ok(context.into_uploaded(reference))
    }

    async fn predict(
        &mut self,
        context: SubmissionContext<UploadedState>,
    ) -> Result<SubmissionContext<PredictedState>, TransferError> {
        let request = PredictRequest::new(
            context.storage_reference().clone(),
            context.submission().use_ensemble,
        );
        let models = self
            .predict
            .ready()
            .await
            .map_err(|e| TransferError::Prediction(RemoteCallError::from_boxed(e)))?
            .call(request)
            .await
            .map_err(|e| TransferError::Prediction(RemoteCallError::from_boxed(e)))?;

        debug!(
            "Submission {} received {} model results after {:?}",
            context.submission().id,
            models.len(),
            context.stage_elapsed()
        );
        Ok(context.into_predicted(models))
    }
}

pub struct TransferClientBuilder {
    transport: Arc<dyn InferenceTransport>,
    timeout: Option<Duration>,
}

impl TransferClientBuilder {
    // Applies to each remote call separately, not to the whole submission.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> TransferClient {
        let upload = ServiceBuilder::new()
            .option_layer(self.timeout.map(TimeoutLayer::new))
            .service(UploadService::new(self.transport.clone()));
        let predict = ServiceBuilder::new()
            .option_layer(self.timeout.map(TimeoutLayer::new))
            .service(PredictService::new(self.transport));

        TransferClient {
            upload: BoxService::new(upload),
            predict: BoxService::new(predict),
        }
    }
}
