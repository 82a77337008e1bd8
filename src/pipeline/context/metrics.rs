use std::time::Duration;

/// Timings collected while a submission moves through the remote calls
#[derive(Debug, Clone, Default)]
pub struct StageMetrics {
    upload_duration: Option<Duration>,
    predict_duration: Option<Duration>,
}

impl StageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_upload_duration(&mut self, duration: Duration) {
        self.upload_duration = Some(duration);
    }

    pub fn record_predict_duration(&mut self, duration: Duration) {
        self.predict_duration = Some(duration);
    }

    pub fn upload_duration(&self) -> Option<Duration> {
        self.upload_duration
    }

    pub fn predict_duration(&self) -> Option<Duration> {
        self.predict_duration
    }
}
