//! OpenAI-compatible chat completions client.

use serde::{Deserialize, Serialize};

use super::{AdvisorConfig, AdvisoryError, AdvisoryGenerator};

/// System message sent ahead of every prompt.
const SYSTEM_PROMPT: &str = "You are a concise personal planning assistant. \
Answer in a few short paragraphs of plain text.";

/// Longest error body kept in [`AdvisoryError::Status`].
const MAX_ERROR_BODY: usize = 300;

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// The subset of the chat completions response we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP advisory backend.
pub struct HttpAdvisor {
    client: reqwest::Client,
    config: AdvisorConfig,
}

impl std::fmt::Debug for HttpAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdvisor")
            .field("endpoint", &self.config.endpoint.as_str())
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl HttpAdvisor {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::Http`] if the HTTP client cannot be built.
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisoryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }
}

impl AdvisoryGenerator for HttpAdvisor {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        tracing::debug!(endpoint = %self.config.endpoint, model = %self.config.model, "sending advisory request");
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let body = check_status(status, body)?;

        extract_text(&body)
    }
}

/// Passes a success body through; maps anything else to
/// [`AdvisoryError::Status`] with the body cut to [`MAX_ERROR_BODY`] chars.
fn check_status(status: reqwest::StatusCode, body: String) -> Result<String, AdvisoryError> {
    if status.is_success() {
        return Ok(body);
    }
    Err(AdvisoryError::Status {
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY).collect(),
    })
}

/// Pulls the first choice's text out of a chat completions response body.
fn extract_text(body: &str) -> Result<String, AdvisoryError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| AdvisoryError::InvalidResponse(e.to_string()))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AdvisoryError::EmptyResponse);
    }
    Ok(text)
}
