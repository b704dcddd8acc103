use std::time::Duration;

use tracing::{info, warn};

use crate::{
    error::{PlannerError, Result},
    schemas::DocumentValidator,
    services::BackendRegistry,
    types::ItineraryDocument,
};

use super::compiler::GenerationRequest;

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorOptions {
    /// Deadline per backend call; a slower backend counts as failed.
    pub call_timeout: Duration,
    /// First backoff after a rate-limit signal.
    pub initial_backoff: Duration,
    /// Backoff never grows past this, whatever Retry-After claims.
    pub max_backoff: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(60),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

/// Drives one generation attempt across the backend registry.
///
/// Backends are tried strictly in order, one in flight at a time. Every
/// per-backend failure becomes an "advance" signal; a rate-limit signal
/// additionally waits out a cumulative doubling backoff before moving on.
/// The same backend is never retried within a run. Only the aggregated
/// exhaustion error crosses this boundary.
#[derive(Debug, Clone)]
pub struct GenerationOrchestrator {
    registry: BackendRegistry,
    options: OrchestratorOptions,
}

impl GenerationOrchestrator {
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            registry,
            options: OrchestratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.options.call_timeout = call_timeout;
        self
    }

    /// Run the request to completion or exhaustion. The request is consumed;
    /// a resubmission compiles a fresh one.
    pub async fn generate(&self, request: GenerationRequest) -> Result<ItineraryDocument> {
        if self.registry.is_empty() {
            return Err(PlannerError::Config(
                "backend registry is empty".to_string(),
            ));
        }

        let validator = DocumentValidator::new().with_expected_days(request.expected_days);
        let mut backoff = self.options.initial_backoff;
        let mut attempts = 0usize;
        let mut last_error: Option<PlannerError> = None;

        for backend in self.registry.iter() {
            attempts += 1;
            info!(
                target: "nile::orchestrator",
                backend = backend.id(),
                attempt = attempts,
                "invoking backend"
            );

            let outcome =
                tokio::time::timeout(self.options.call_timeout, backend.generate(&request)).await;

            let failure = match outcome {
                Err(_) => PlannerError::Timeout(self.options.call_timeout),
                Ok(Err(err)) => err,
                Ok(Ok(raw)) => match validator.validate_str(&raw) {
                    Ok(document) => {
                        info!(
                            target: "nile::orchestrator",
                            backend = backend.id(),
                            attempts,
                            days = document.days.len(),
                            "itinerary validated"
                        );
                        return Ok(document);
                    }
                    // Shape violation from a live backend: the validator has
                    // already spent its one repair attempt.
                    Err(err) => err,
                },
            };

            warn!(
                target: "nile::orchestrator",
                backend = backend.id(),
                code = failure.error_code(),
                error = %failure,
                "backend failed, advancing"
            );

            if let Some(signalled) = failure.advance_backoff() {
                let wait = signalled.max(backoff).min(self.options.max_backoff);
                tokio::time::sleep(wait).await;
                backoff = (backoff * 2).min(self.options.max_backoff);
            }

            last_error = Some(failure);
        }

        let last = last_error.unwrap_or_else(|| {
            PlannerError::Backend("no backend produced a classifiable failure".to_string())
        });
        Err(PlannerError::Exhausted {
            attempts,
            last: Box::new(last),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::schemas::CompletionSchema;
    use crate::services::GenerationBackend;
    use crate::types::ItineraryDocument;

    fn valid_payload(days: u32) -> String {
        json!({
            "tripTitle": "Test",
            "greeting": "Hi",
            "summary": "Short.",
            "totalEstimatedCost": "$1,000 - $2,000 per person",
            "priceIncludes": ["Entry Tickets"],
            "highlights": ["Giza"],
            "days": (1..=days).map(|d| json!({
                "day": d, "title": format!("Day {d}"), "activities": ["See things"]
            })).collect::<Vec<_>>(),
            "accommodationOptions": [
                {"name": "Mena House", "type": "Hotel", "description": "Nice."}
            ],
            "travelTips": ["Tip well"]
        })
        .to_string()
    }

    fn request(days: u32) -> GenerationRequest {
        GenerationRequest {
            instruction: "generate".to_string(),
            schema: ItineraryDocument::schema(),
            expected_days: days,
        }
    }

    #[derive(Debug)]
    struct ScriptedBackend {
        name: String,
        response: Result<String>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedBackend {
        fn new(name: &str, response: Result<String>) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Arc::new(Self {
                    name: name.to_string(),
                    response,
                    calls: Arc::clone(&calls),
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        fn id(&self) -> &str {
            &self.name
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(PlannerError::RateLimited { retry_after }) => Err(PlannerError::RateLimited {
                    retry_after: *retry_after,
                }),
                Err(PlannerError::Unavailable(msg)) => {
                    Err(PlannerError::Unavailable(msg.clone()))
                }
                Err(other) => Err(PlannerError::Backend(other.to_string())),
            }
        }
    }

    #[derive(Debug)]
    struct SlowBackend {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GenerationBackend for SlowBackend {
        fn id(&self) -> &str {
            "slow"
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(valid_payload(3))
        }
    }

    fn orchestrator(backends: Vec<Arc<dyn GenerationBackend>>) -> GenerationOrchestrator {
        GenerationOrchestrator::new(BackendRegistry::new(backends)).with_options(
            OrchestratorOptions {
                call_timeout: Duration::from_secs(5),
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(4),
            },
        )
    }

    #[tokio::test]
    async fn succeeds_on_the_last_backend_after_n_attempts() {
        let mut backends: Vec<Arc<dyn GenerationBackend>> = Vec::new();
        let mut counters = Vec::new();
        for i in 0..4 {
            let (backend, calls) = ScriptedBackend::new(
                &format!("down-{i}"),
                Err(PlannerError::Unavailable("gone".to_string())),
            );
            backends.push(backend);
            counters.push(calls);
        }
        let (ok_backend, ok_calls) = ScriptedBackend::new("healthy", Ok(valid_payload(3)));
        backends.push(ok_backend);

        let document = orchestrator(backends).generate(request(3)).await.unwrap();
        assert_eq!(document.days.len(), 3);
        for calls in &counters {
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
        assert_eq!(ok_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_returns_typed_error_with_last_cause() {
        let (first, _) = ScriptedBackend::new(
            "limited",
            Err(PlannerError::RateLimited { retry_after: 1 }),
        );
        let (second, _) = ScriptedBackend::new(
            "down",
            Err(PlannerError::Unavailable("retired model".to_string())),
        );
        // Backoff options keep the rate-limit wait in the millisecond range
        // so this test stays fast.
        let err = orchestrator(vec![first, second])
            .generate(request(3))
            .await
            .unwrap_err();
        match err {
            PlannerError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, PlannerError::Unavailable(_)));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limited_backend_is_not_retried() {
        let (limited, limited_calls) = ScriptedBackend::new(
            "limited",
            Err(PlannerError::RateLimited { retry_after: 1 }),
        );
        let (ok_backend, _) = ScriptedBackend::new("healthy", Ok(valid_payload(3)));
        let document = orchestrator(vec![limited, ok_backend])
            .generate(request(3))
            .await
            .unwrap();
        assert_eq!(document.days.len(), 3);
        assert_eq!(limited_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shape_violation_advances_to_next_backend() {
        let (bad, _) = ScriptedBackend::new("sloppy", Ok("not json at all".to_string()));
        let (short, _) = ScriptedBackend::new("short", Ok(valid_payload(2)));
        let (good, _) = ScriptedBackend::new("good", Ok(valid_payload(3)));
        let document = orchestrator(vec![bad, short, good])
            .generate(request(3))
            .await
            .unwrap();
        assert_eq!(document.days.len(), 3);
    }

    #[tokio::test]
    async fn prose_wrapped_payload_is_repaired_not_advanced() {
        let wrapped = format!("Here you go!\n{}\nSafe travels.", valid_payload(3));
        let (backend, _) = ScriptedBackend::new("chatty", Ok(wrapped));
        let document = orchestrator(vec![backend]).generate(request(3)).await.unwrap();
        assert_eq!(document.trip_title, "Test");
    }

    #[tokio::test]
    async fn slow_backend_times_out_and_the_next_one_answers() {
        let slow_calls = Arc::new(AtomicUsize::new(0));
        let slow: Arc<dyn GenerationBackend> = Arc::new(SlowBackend {
            calls: Arc::clone(&slow_calls),
        });
        let (healthy, healthy_calls) = ScriptedBackend::new("healthy", Ok(valid_payload(3)));
        let document = orchestrator(vec![slow, healthy])
            .with_call_timeout(Duration::from_millis(10))
            .generate(request(3))
            .await
            .unwrap();
        assert_eq!(document.days.len(), 3);
        assert_eq!(slow_calls.load(Ordering::SeqCst), 1);
        assert_eq!(healthy_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_slow_backends_exhaust_with_a_timeout_cause() {
        let slow: Arc<dyn GenerationBackend> = Arc::new(SlowBackend {
            calls: Arc::new(AtomicUsize::new(0)),
        });
        let err = orchestrator(vec![slow])
            .with_call_timeout(Duration::from_millis(10))
            .generate(request(3))
            .await
            .unwrap_err();
        match err {
            PlannerError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 1);
                assert!(matches!(*last, PlannerError::Timeout(_)));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_registry_is_a_config_error() {
        let err = orchestrator(Vec::new()).generate(request(3)).await.unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }
}
