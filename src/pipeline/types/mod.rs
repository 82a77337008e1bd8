mod class_registry;
mod image_file;
mod prediction;
mod raw_model_result;
mod storage_reference;
mod submission;

pub use class_registry::{ClassRegistry, DIAGNOSTIC_CLASSES};
pub use image_file::ImageFile;
pub use prediction::{
    ModelLabel, NormalizedPrediction, WinningClass, ENSEMBLE_LABEL, MODEL_NOT_AVAILABLE,
    NOT_AVAILABLE, UNRECOGNIZED_CLASS,
};
pub use raw_model_result::RawModelResult;
pub use storage_reference::StorageReference;
pub use submission::Submission;
