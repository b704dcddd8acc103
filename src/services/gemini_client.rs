use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    core::GenerationRequest,
    error::{PlannerError, Result},
    services::backend::{BackendRegistry, GenerationBackend},
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Shared HTTP client for the Gemini generateContent endpoint.
///
/// Credentials are injected at construction; the library never reads the
/// environment itself.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Build an ordered registry of one backend per model identifier.
    pub fn registry(self, models: &[&str]) -> BackendRegistry {
        let client = Arc::new(self);
        BackendRegistry::new(
            models
                .iter()
                .map(|model| {
                    Arc::new(GeminiBackend {
                        client: Arc::clone(&client),
                        model: model.to_string(),
                    }) as Arc<dyn GenerationBackend>
                })
                .collect(),
        )
    }

    async fn generate_content(&self, model: &str, request: &GenerationRequest) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": request.instruction }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema.schema_json(),
            }
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| PlannerError::Backend(format!("HTTP request failed: {err}")))?;

        let status = response.status();
        let headers = response.headers().clone();
        let response_text = response
            .text()
            .await
            .map_err(|err| PlannerError::Backend(format!("failed to read response: {err}")))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = headers
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(PlannerError::RateLimited { retry_after });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(PlannerError::Unavailable(format!(
                "model `{model}` is not served at {}",
                self.base_url
            )));
        }

        if !status.is_success() {
            let api_message = serde_json::from_str::<Value>(&response_text)
                .ok()
                .as_ref()
                .and_then(|v| v.get("error"))
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(response_text);
            return Err(PlannerError::Backend(format!(
                "HTTP {status} error: {api_message}"
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|err| PlannerError::Backend(format!("unparseable response body: {err}")))?;

        if let Some(error) = response_json.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(PlannerError::Backend(format!("API error: {message}")));
        }

        let text = response_json
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(|c| c.pointer("/content/parts/0/text"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                PlannerError::Backend("response carried no candidate text".to_string())
            })?;

        debug!(target: "nile::backend", model, bytes = text.len(), "received candidate text");
        Ok(text.to_string())
    }
}

/// One (client, model) pair in the registry.
#[derive(Debug)]
pub struct GeminiBackend {
    client: Arc<GeminiClient>,
    model: String,
}

impl GeminiBackend {
    pub fn new(client: Arc<GeminiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.client.generate_content(&self.model, request).await
    }
}
