pub mod consensus;
pub mod orchestrator;

pub use consensus::{confidence_percent, Consensus, Verdict};
pub use orchestrator::{Orchestrator, RequestState, FALLBACK_ERROR};
