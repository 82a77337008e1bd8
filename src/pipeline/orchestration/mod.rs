pub mod orchestrator;
pub mod presentation;
pub mod session_state;

pub use orchestrator::{PredictionOrchestrator, PredictionOrchestratorBuilder};
pub use presentation::{probability_breakdown, PresentationSnapshot};
pub use session_state::{RequestOutcome, SessionState, FAILURE_MESSAGE, SUCCESS_MESSAGE};
