use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

pub const UPLOAD_PATH: &str = "/upload";
pub const PREDICT_PATH: &str = "/predict";

const CONFIG_FILE: &str = "osteo-predict";
const ENV_PREFIX: &str = "OSTEO_PREDICT";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub service_url: String,
    pub request_timeout_secs: Option<u64>,
    pub use_ensemble: bool,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            service_url: "https://osteoai-hsbgbsepgxfzdgf5.eastus-01.azurewebsites.net".to_string(),
            request_timeout_secs: None,
            use_ensemble: false,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Layers an optional `osteo-predict.{toml,json,yaml}` file and
    /// `OSTEO_PREDICT_*` environment variables over the defaults.
    pub fn load() -> Result<Self, AppError> {
        let configuration: Configuration = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.service_url.starts_with("http://") || self.service_url.starts_with("https://"))
        {
            return Err(AppError::InvalidConfiguration(format!(
                "service_url must be an http(s) URL, got '{}'",
                self.service_url
            )));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(AppError::InvalidConfiguration(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(AppError::InvalidConfiguration(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.service_url.trim_end_matches('/'), UPLOAD_PATH)
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.service_url.trim_end_matches('/'), PREDICT_PATH)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
