use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::pipeline::types::ImageFile;

/// Everything one press of "submit" hands to the transfer client.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub image: ImageFile,
    pub use_ensemble: bool,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(image: ImageFile, use_ensemble: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            use_ensemble,
            submitted_at: Utc::now(),
        }
    }
}
