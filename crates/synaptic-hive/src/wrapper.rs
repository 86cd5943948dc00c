use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::backend::{BlockingBackend, BlockingHttpBackend, HiveBackend, HiveRequest, HiveResponse};
use crate::request::{GenerationParams, HivePayload, HiveQuery};
use crate::{HiveConfig, HiveError, HttpBackend};

/// Low-level client for the Hive Intelligence search endpoint.
///
/// [`process_query`](Self::process_query) blocks the calling thread;
/// [`aprocess_query`](Self::aprocess_query) suspends the calling task. Both
/// go through the same request preparation and response interpretation, so
/// identical inputs put identical bytes on the wire.
pub struct HiveSearchApiWrapper {
    config: HiveConfig,
    backend: Arc<dyn HiveBackend>,
    // Built on first blocking call: a blocking reqwest client must not be
    // created or dropped on an async runtime worker.
    blocking: OnceLock<Arc<dyn BlockingBackend>>,
}

impl HiveSearchApiWrapper {
    pub fn new(config: HiveConfig) -> Result<Self, HiveError> {
        config.validate()?;
        let backend = HttpBackend::new(&config)?;
        Ok(Self {
            config,
            backend: Arc::new(backend),
            blocking: OnceLock::new(),
        })
    }

    /// Use caller-supplied transports instead of reqwest.
    pub fn with_backends(
        config: HiveConfig,
        backend: Arc<dyn HiveBackend>,
        blocking: Arc<dyn BlockingBackend>,
    ) -> Result<Self, HiveError> {
        config.validate()?;
        let cell = OnceLock::new();
        let _ = cell.set(blocking);
        Ok(Self {
            config,
            backend,
            blocking: cell,
        })
    }

    pub fn config(&self) -> &HiveConfig {
        &self.config
    }

    /// Send one query and wait for the decoded JSON reply on this thread.
    pub fn process_query(
        &self,
        query: &HiveQuery,
        params: &GenerationParams,
    ) -> Result<Value, HiveError> {
        let request = self.prepare(query, params)?;
        let response = self.blocking_backend()?.send(request)?;
        interpret(response)
    }

    /// Async counterpart of [`process_query`](Self::process_query).
    pub async fn aprocess_query(
        &self,
        query: &HiveQuery,
        params: &GenerationParams,
    ) -> Result<Value, HiveError> {
        let request = self.prepare(query, params)?;
        let response = self.backend.send(request).await?;
        interpret(response)
    }

    /// Build the outbound request without sending it.
    pub fn prepare(
        &self,
        query: &HiveQuery,
        params: &GenerationParams,
    ) -> Result<HiveRequest, HiveError> {
        validate_query(query)?;
        let body = HivePayload::new(query, params).to_bytes()?;

        tracing::debug!(
            endpoint = %self.config.base_url,
            query = query.kind(),
            bytes = body.len(),
            "sending hive search request"
        );

        Ok(HiveRequest {
            url: self.config.base_url.clone(),
            headers: vec![
                ("api-key".to_string(), self.config.api_key.clone()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }

    fn blocking_backend(&self) -> Result<Arc<dyn BlockingBackend>, HiveError> {
        if let Some(backend) = self.blocking.get() {
            return Ok(Arc::clone(backend));
        }
        let built: Arc<dyn BlockingBackend> = Arc::new(BlockingHttpBackend::new(&self.config)?);
        Ok(Arc::clone(self.blocking.get_or_init(|| built)))
    }
}

fn validate_query(query: &HiveQuery) -> Result<(), HiveError> {
    match query {
        HiveQuery::Prompt(p) if p.is_empty() => Err(HiveError::InvalidInput(
            "prompt must not be empty".to_string(),
        )),
        HiveQuery::Messages(m) if m.is_empty() => Err(HiveError::InvalidInput(
            "messages must not be empty".to_string(),
        )),
        _ => Ok(()),
    }
}

fn interpret(response: HiveResponse) -> Result<Value, HiveError> {
    tracing::debug!(
        status = response.status,
        bytes = response.body.len(),
        "hive search response received"
    );

    if !(200..300).contains(&response.status) {
        let body = String::from_utf8_lossy(&response.body).into_owned();
        tracing::warn!(status = response.status, "hive search request rejected");
        return Err(HiveError::Status {
            status: response.status,
            body,
        });
    }

    serde_json::from_slice(&response.body).map_err(|e| HiveError::MalformedResponse(e.to_string()))
}

/// Answer text, read from `response` or `content`.
pub fn answer_text(response: &Value) -> Option<&str> {
    response
        .get("response")
        .or_else(|| response.get("content"))
        .and_then(Value::as_str)
}

/// Cited sources, read from `data_sources` or `sources`.
pub fn data_sources(response: &Value) -> Option<&Vec<Value>> {
    response
        .get("data_sources")
        .or_else(|| response.get("sources"))
        .and_then(Value::as_array)
}
