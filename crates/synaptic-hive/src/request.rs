use serde::{Deserialize, Serialize};

use crate::HiveError;

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiveMessage {
    pub role: String,
    pub content: String,
}

impl HiveMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// What the service is asked: a single prompt or a conversation history.
#[derive(Debug, Clone, PartialEq)]
pub enum HiveQuery {
    Prompt(String),
    Messages(Vec<HiveMessage>),
}

impl HiveQuery {
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self::Prompt(prompt.into())
    }

    pub fn messages(messages: impl IntoIterator<Item = HiveMessage>) -> Self {
        Self::Messages(messages.into_iter().collect())
    }

    /// Build from the optional pair accepted at the tool boundary.
    ///
    /// Exactly one of `prompt` and `messages` must be present.
    pub fn from_parts(
        prompt: Option<String>,
        messages: Option<Vec<HiveMessage>>,
    ) -> Result<Self, HiveError> {
        match (prompt, messages) {
            (Some(prompt), None) => Ok(Self::Prompt(prompt)),
            (None, Some(messages)) => Ok(Self::Messages(messages)),
            (None, None) => Err(HiveError::InvalidInput(
                "either 'prompt' or 'messages' must be provided".to_string(),
            )),
            (Some(_), Some(_)) => Err(HiveError::InvalidInput(
                "provide either 'prompt' or 'messages', not both".to_string(),
            )),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Prompt(_) => "prompt",
            Self::Messages(_) => "messages",
        }
    }
}

/// Generation controls forwarded untouched to the service.
///
/// Range checking is left to the API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<i64>,
    pub include_data_sources: Option<bool>,
    /// Blockchain address used as context by the service.
    pub wallet: Option<String>,
}

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: i64) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_include_data_sources(mut self, include: bool) -> Self {
        self.include_data_sources = Some(include);
        self
    }

    pub fn with_wallet(mut self, wallet: impl Into<String>) -> Self {
        self.wallet = Some(wallet.into());
        self
    }
}

/// JSON body posted to the service. Unset members are left out, and so are
/// non-finite floats, which JSON can only spell as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HivePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<&'a [HiveMessage]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_data_sources: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<&'a str>,
}

impl<'a> HivePayload<'a> {
    pub fn new(query: &'a HiveQuery, params: &'a GenerationParams) -> Self {
        let (prompt, messages) = match query {
            HiveQuery::Prompt(p) => (Some(p.as_str()), None),
            HiveQuery::Messages(m) => (None, Some(m.as_slice())),
        };
        Self {
            prompt,
            messages,
            temperature: params.temperature.filter(|t| t.is_finite()),
            top_p: params.top_p.filter(|p| p.is_finite()),
            top_k: params.top_k,
            include_data_sources: params.include_data_sources,
            wallet: params.wallet.as_deref(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, HiveError> {
        serde_json::to_vec(self)
            .map_err(|e| HiveError::InvalidInput(format!("failed to serialize payload: {e}")))
    }
}
