pub mod compiler;
pub mod orchestrator;

pub use compiler::{GenerationRequest, RequestCompiler};
pub use orchestrator::{GenerationOrchestrator, OrchestratorOptions};
