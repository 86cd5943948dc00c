use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{HiveConfig, HiveError};

/// Fully prepared outbound call. The body is already serialized so every
/// transport sends the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiveRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HiveRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw reply; interpretation happens in the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiveResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HiveResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }
}

/// Non-blocking transport.
#[async_trait]
pub trait HiveBackend: Send + Sync {
    async fn send(&self, request: HiveRequest) -> Result<HiveResponse, HiveError>;
}

/// Blocking transport; runs on the calling thread.
pub trait BlockingBackend: Send + Sync {
    fn send(&self, request: HiveRequest) -> Result<HiveResponse, HiveError>;
}

/// Production async backend using reqwest.
pub struct HttpBackend {
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &HiveConfig) -> Result<Self, HiveError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| HiveError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HiveBackend for HttpBackend {
    async fn send(&self, request: HiveRequest) -> Result<HiveResponse, HiveError> {
        let mut builder = self.client.post(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder.body(request.body).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HiveResponse { status, body })
    }
}

/// Production blocking backend using `reqwest::blocking`.
///
/// Must not be driven from inside an async runtime worker; use
/// `tokio::task::spawn_blocking` there.
pub struct BlockingHttpBackend {
    client: reqwest::blocking::Client,
}

impl BlockingHttpBackend {
    pub fn new(config: &HiveConfig) -> Result<Self, HiveError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| HiveError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl BlockingBackend for BlockingHttpBackend {
    fn send(&self, request: HiveRequest) -> Result<HiveResponse, HiveError> {
        let mut builder = self.client.post(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let response = builder.body(request.body).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        Ok(HiveResponse { status, body })
    }
}

/// Test backend with queued responses. Records every request it sees.
#[derive(Clone, Default)]
pub struct FakeBackend {
    responses: Arc<Mutex<VecDeque<Result<HiveResponse, HiveError>>>>,
    requests: Arc<Mutex<Vec<HiveRequest>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: HiveResponse) -> &Self {
        lock(&self.responses).push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: HiveError) -> &Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HiveRequest> {
        lock(&self.requests).clone()
    }

    fn next(&self, request: HiveRequest) -> Result<HiveResponse, HiveError> {
        lock(&self.requests).push(request);
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Err(HiveError::Transport("FakeBackend exhausted".to_string())))
    }
}

// A poisoned lock only means another test thread panicked mid-push.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl HiveBackend for FakeBackend {
    async fn send(&self, request: HiveRequest) -> Result<HiveResponse, HiveError> {
        self.next(request)
    }
}

impl BlockingBackend for FakeBackend {
    fn send(&self, request: HiveRequest) -> Result<HiveResponse, HiveError> {
        self.next(request)
    }
}
