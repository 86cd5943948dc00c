//! Hive Intelligence search tool integration for the Synaptic framework.
//!
//! This crate provides [`HiveSearchTool`], a crypto / Web3 search tool that
//! implements the [`Tool`](synaptic_core::Tool) trait on top of the
//! [Hive Intelligence](https://hiveintelligence.xyz/) API, and the lower-level
//! [`HiveSearchApiWrapper`] it delegates to.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use synaptic_hive::{HiveConfig, HiveSearchTool};
//! use synaptic_core::Tool;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tool = HiveSearchTool::new(HiveConfig::new("your-api-key"))?;
//!
//! let result = tool
//!     .call(json!({"prompt": "What's the current price of Bitcoin?"}))
//!     .await?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```
//!
//! Outside an async runtime the same request can be made with
//! [`HiveSearchTool::invoke`].

mod backend;
mod config;
mod error;
mod request;
mod tool;
mod wrapper;

pub use backend::{
    BlockingBackend, BlockingHttpBackend, FakeBackend, HiveBackend, HiveRequest, HiveResponse,
    HttpBackend,
};
pub use config::{ConfigFormat, HiveConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::HiveError;
pub use request::{GenerationParams, HiveMessage, HivePayload, HiveQuery};
pub use tool::{HiveSearchInput, HiveSearchTool, DEFAULT_INCLUDE_DATA_SOURCES, DEFAULT_TEMPERATURE};
pub use wrapper::{answer_text, data_sources, HiveSearchApiWrapper};

// Re-export core trait for convenience.
pub use synaptic_core::Tool;
