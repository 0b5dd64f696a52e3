//! Advisory text for the active task list.
//!
//! Advice is produced by an external text-completion service. The task
//! store never waits on it: requests run on background tokio tasks and
//! their results are drained by the UI loop like any other event.
//!
//! # Submodules
//!
//! - [`http`]: OpenAI-compatible chat completions client
//! - [`prompt`]: renders the active-task snapshot into a prompt
//! - [`service`]: spawns requests and delivers [`AdvisoryEvent`]s
//! - [`panel`]: display state (text, error, loading flag)

pub mod http;
pub mod panel;
pub mod prompt;
pub mod service;

use std::future::Future;
use std::time::Duration;

pub use http::HttpAdvisor;
pub use panel::AdvisoryPanel;
pub use prompt::build_prompt;
pub use service::{AdvisoryEvent, AdvisoryRequest, AdvisoryService};

/// Errors that can occur while generating advice.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// No API key was configured, so no service is available.
    #[error("advice is not configured (set the API key environment variable)")]
    NotConfigured,

    /// The request could not be sent or the connection failed.
    #[error("could not reach advisory service: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("advisory service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected advisory response: {0}")]
    InvalidResponse(String),

    /// The service answered with no usable text.
    #[error("advisory service returned no text")]
    EmptyResponse,
}

/// Connection settings for [`HttpAdvisor`].
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Chat completions endpoint.
    pub endpoint: url::Url,
    /// Model name.
    pub model: String,
    /// Bearer token, read from the environment.
    pub api_key: String,
    /// Optional transport timeout.
    pub request_timeout: Option<Duration>,
}

/// A text-completion backend that turns a prompt into advice.
///
/// Implementations include:
/// - [`HttpAdvisor`]: OpenAI-compatible HTTP endpoint
/// - in-process fakes used by the tests
pub trait AdvisoryGenerator: Send + Sync + 'static {
    /// Generate advisory text for `prompt`.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AdvisoryError>> + Send;
}
