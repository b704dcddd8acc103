use std::time::Duration;

use thiserror::Error;

/// Main error type for the itinerary planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Trip specification invalid: {0}")]
    Specification(String),

    #[error("Routing conflict: {0}")]
    RuleConflict(String),

    #[error("Backend rate limited: retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("All {attempts} backends failed; last error: {last}. {guidance}", guidance = .last.guidance())]
    Exhausted {
        attempts: usize,
        last: Box<PlannerError>,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Whether the orchestrator should keep walking the registry after this error.
    pub fn advances_registry(&self) -> bool {
        matches!(
            self,
            PlannerError::RateLimited { .. }
                | PlannerError::Unavailable(_)
                | PlannerError::Backend(_)
                | PlannerError::Timeout(_)
                | PlannerError::SchemaViolation(_)
                | PlannerError::Serialization(_)
        )
    }

    /// Backoff to observe before advancing to the next backend, if any.
    pub fn advance_backoff(&self) -> Option<Duration> {
        match self {
            PlannerError::RateLimited { retry_after } => {
                Some(Duration::from_secs((*retry_after).max(1)))
            }
            _ => None,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Specification(_) => "SPECIFICATION_ERROR",
            PlannerError::RuleConflict(_) => "RULE_CONFLICT",
            PlannerError::RateLimited { .. } => "RATE_LIMIT_ERROR",
            PlannerError::Unavailable(_) => "BACKEND_UNAVAILABLE",
            PlannerError::Backend(_) => "BACKEND_ERROR",
            PlannerError::Timeout(_) => "TIMEOUT_ERROR",
            PlannerError::SchemaViolation(_) => "SCHEMA_VIOLATION",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Exhausted { .. } => "BACKENDS_EXHAUSTED",
        }
    }

    /// Remediation hint shown alongside terminal failures.
    pub fn guidance(&self) -> &'static str {
        match self {
            PlannerError::RateLimited { .. } => {
                "Check the API quota for this key, or wait before resubmitting"
            }
            PlannerError::Unavailable(_) => {
                "Check that the configured model identifiers are still served"
            }
            PlannerError::Backend(_) | PlannerError::Timeout(_) => {
                "Check credentials and network connectivity to the generation service"
            }
            PlannerError::SchemaViolation(_) | PlannerError::Serialization(_) => {
                "The model returned a malformed document; resubmitting usually succeeds"
            }
            _ => "See the error detail above",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "advances": self.advances_registry()
            }
        })
    }
}
