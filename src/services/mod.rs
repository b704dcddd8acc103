pub mod backend;
pub mod gemini_client;

pub use backend::{BackendRegistry, GenerationBackend};
pub use gemini_client::{GeminiBackend, GeminiClient};
