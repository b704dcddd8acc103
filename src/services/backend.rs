use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{core::GenerationRequest, error::Result};

/// A candidate generative backend, callable through a uniform interface.
///
/// Implementations return the raw (hopefully JSON) response text and map
/// transport failures onto the planner error taxonomy so the orchestrator
/// can classify them.
#[async_trait]
pub trait GenerationBackend: Send + Sync + fmt::Debug {
    /// Stable identifier used in logs and error messages.
    fn id(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// Ordered list of candidate backends, tried front to back.
///
/// Read-only after construction; the ordering is the failover policy.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn GenerationBackend>>,
}

impl BackendRegistry {
    pub fn new(backends: Vec<Arc<dyn GenerationBackend>>) -> Self {
        Self { backends }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn GenerationBackend>> {
        self.backends.iter()
    }
}
