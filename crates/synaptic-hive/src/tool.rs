use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use synaptic_core::{SynapticError, Tool};

use crate::backend::{BlockingBackend, HiveBackend};
use crate::request::{GenerationParams, HiveMessage, HiveQuery};
use crate::{HiveConfig, HiveError, HiveSearchApiWrapper};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_INCLUDE_DATA_SOURCES: bool = true;

/// Arguments accepted by [`HiveSearchTool`].
///
/// Omitted fields take the tool defaults: `temperature = 0.7`,
/// `include_data_sources = true`, everything else unset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HiveSearchInput {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<HiveMessage>>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub top_k: Option<i64>,
    #[serde(default = "default_include_data_sources")]
    pub include_data_sources: bool,
    #[serde(default)]
    pub wallet: Option<String>,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_include_data_sources() -> bool {
    DEFAULT_INCLUDE_DATA_SOURCES
}

impl HiveSearchInput {
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::empty()
        }
    }

    pub fn messages(messages: impl IntoIterator<Item = HiveMessage>) -> Self {
        Self {
            messages: Some(messages.into_iter().collect()),
            ..Self::empty()
        }
    }

    fn empty() -> Self {
        Self {
            prompt: None,
            messages: None,
            temperature: DEFAULT_TEMPERATURE,
            top_p: None,
            top_k: None,
            include_data_sources: DEFAULT_INCLUDE_DATA_SOURCES,
            wallet: None,
        }
    }

    /// Parse tool-call arguments. Explicit JSON `null`s fall back to defaults.
    pub fn from_args(args: Value) -> Result<Self, SynapticError> {
        let args = match args {
            Value::Object(map) => {
                Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect())
            }
            Value::Null => json!({}),
            other => {
                return Err(SynapticError::Tool(format!(
                    "hive_search arguments must be an object, got {other}"
                )))
            }
        };
        serde_json::from_value(args)
            .map_err(|e| SynapticError::Tool(format!("invalid hive_search arguments: {e}")))
    }

    /// Split into the wrapper's query and parameter types.
    pub fn into_parts(self) -> Result<(HiveQuery, GenerationParams), HiveError> {
        let query = HiveQuery::from_parts(self.prompt, self.messages)?;
        let params = GenerationParams {
            temperature: Some(self.temperature),
            top_p: self.top_p,
            top_k: self.top_k,
            include_data_sources: Some(self.include_data_sources),
            wallet: self.wallet,
        };
        Ok((query, params))
    }
}

/// Hive Intelligence search exposed as a Synaptic [`Tool`].
///
/// The async [`Tool::call`] path goes through the wrapper's non-blocking
/// client; [`invoke`](Self::invoke) and [`run`](Self::run) block the calling
/// thread. A failed request surfaces once, as [`SynapticError::Config`] when
/// the client could not be set up and [`SynapticError::Tool`] otherwise, and
/// is never retried.
pub struct HiveSearchTool {
    api_wrapper: HiveSearchApiWrapper,
}

impl HiveSearchTool {
    pub fn new(config: HiveConfig) -> Result<Self, HiveError> {
        Ok(Self {
            api_wrapper: HiveSearchApiWrapper::new(config)?,
        })
    }

    /// Build from `HIVE_INTELLIGENCE_API_KEY` / `HIVE_BASE_URL`.
    pub fn from_env() -> Result<Self, HiveError> {
        Self::new(HiveConfig::from_env()?)
    }

    pub fn with_backends(
        config: HiveConfig,
        backend: Arc<dyn HiveBackend>,
        blocking: Arc<dyn BlockingBackend>,
    ) -> Result<Self, HiveError> {
        Ok(Self {
            api_wrapper: HiveSearchApiWrapper::with_backends(config, backend, blocking)?,
        })
    }

    pub fn api_wrapper(&self) -> &HiveSearchApiWrapper {
        &self.api_wrapper
    }

    /// Blocking call with typed input.
    pub fn run(&self, input: HiveSearchInput) -> Result<Value, SynapticError> {
        let (query, params) = input.into_parts().map_err(tool_error)?;
        self.api_wrapper
            .process_query(&query, &params)
            .map_err(tool_error)
    }

    /// Async call with typed input.
    pub async fn arun(&self, input: HiveSearchInput) -> Result<Value, SynapticError> {
        let (query, params) = input.into_parts().map_err(tool_error)?;
        self.api_wrapper
            .aprocess_query(&query, &params)
            .await
            .map_err(tool_error)
    }

    /// Blocking call with raw tool-call arguments.
    pub fn invoke(&self, args: Value) -> Result<Value, SynapticError> {
        self.run(HiveSearchInput::from_args(args)?)
    }
}

fn tool_error(err: HiveError) -> SynapticError {
    tracing::debug!(error = %err, "hive_search failed");
    SynapticError::from(err)
}

#[async_trait]
impl Tool for HiveSearchTool {
    fn name(&self) -> &'static str {
        "hive_search"
    }

    fn description(&self) -> &'static str {
        "Search crypto, DeFi and Web3 data with Hive Intelligence. \
         Pass either a natural-language 'prompt' or a 'messages' conversation \
         history. Returns the answer together with the data sources it cites."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "Natural-language query. Use either prompt or messages."
                },
                "messages": {
                    "type": "array",
                    "description": "Conversation history, oldest first. Use either prompt or messages.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "role": {"type": "string", "description": "user | assistant | system"},
                            "content": {"type": "string"}
                        },
                        "required": ["role", "content"]
                    }
                },
                "temperature": {
                    "type": "number",
                    "description": "Sampling temperature (default 0.7)",
                    "default": DEFAULT_TEMPERATURE
                },
                "top_p": {
                    "type": "number",
                    "description": "Nucleus sampling probability mass"
                },
                "top_k": {
                    "type": "integer",
                    "description": "Limit token selection to the top k candidates"
                },
                "include_data_sources": {
                    "type": "boolean",
                    "description": "Include the data sources used for the answer (default true)",
                    "default": DEFAULT_INCLUDE_DATA_SOURCES
                },
                "wallet": {
                    "type": "string",
                    "description": "Blockchain wallet address to use as context"
                }
            }
        }))
    }

    async fn call(&self, args: Value) -> Result<Value, SynapticError> {
        self.arun(HiveSearchInput::from_args(args)?).await
    }
}
