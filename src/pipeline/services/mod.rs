pub mod ensemble_selector;
pub mod result_normalizer;

pub use ensemble_selector::{ensemble_view, select_ensemble, EnsembleView};
pub use result_normalizer::ResultNormalizer;
