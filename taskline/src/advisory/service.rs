//! Background execution of advisory requests.
//!
//! ```text
//! UI loop ── AdvisoryRequest ──> spawned tokio task ──> generator
//!    ^                                                     │
//!    └──────────────── AdvisoryEvent (mpsc) ───────────────┘
//! ```
//!
//! Each request gets its own task. Nothing is cancelled when a newer
//! request is issued; events arrive in completion order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{AdvisoryError, AdvisoryGenerator};

/// A single advice request, built by the app from its active-task view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryRequest {
    /// Sequence number assigned by [`AdvisoryPanel`](super::AdvisoryPanel).
    pub generation: u64,
    /// Prompt text.
    pub prompt: String,
}

/// Outcome of a request, delivered to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryEvent {
    /// The service produced advice.
    Completed {
        /// Generation of the originating request.
        generation: u64,
        /// Advice text (never blank).
        text: String,
    },
    /// The request failed; `message` is suitable for display.
    Failed {
        /// Generation of the originating request.
        generation: u64,
        /// User-visible error message.
        message: String,
    },
}

impl AdvisoryEvent {
    /// Generation of the request this event answers.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::Completed { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }

    /// Builds a failure event from an error.
    #[must_use]
    pub fn failed(generation: u64, error: &AdvisoryError) -> Self {
        Self::Failed {
            generation,
            message: error.to_string(),
        }
    }
}

/// Runs advisory requests against a generator off the UI thread.
pub struct AdvisoryService<G> {
    generator: Arc<G>,
    events: mpsc::Sender<AdvisoryEvent>,
}

impl<G: AdvisoryGenerator> AdvisoryService<G> {
    /// Creates a service and the receiver its events are delivered on.
    #[must_use]
    pub fn new(generator: G, buffer: usize) -> (Self, mpsc::Receiver<AdvisoryEvent>) {
        let (events, rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                generator: Arc::new(generator),
                events,
            },
            rx,
        )
    }

    /// Spawns a background task for `request`.
    ///
    /// Returns immediately. Exactly one [`AdvisoryEvent`] is sent when the
    /// generator finishes, unless the receiver has been dropped.
    pub fn request(&self, request: AdvisoryRequest) -> JoinHandle<()> {
        let generator = Arc::clone(&self.generator);
        let events = self.events.clone();

        tokio::spawn(async move {
            let AdvisoryRequest { generation, prompt } = request;
            tracing::info!(generation, "advisory request started");

            let event = match generator.generate(&prompt).await {
                Ok(text) if text.trim().is_empty() => {
                    tracing::warn!(generation, "advisory service returned blank text");
                    AdvisoryEvent::failed(generation, &AdvisoryError::EmptyResponse)
                }
                Ok(text) => {
                    tracing::info!(generation, chars = text.len(), "advisory request completed");
                    AdvisoryEvent::Completed { generation, text }
                }
                Err(e) => {
                    tracing::warn!(generation, error = %e, "advisory request failed");
                    AdvisoryEvent::failed(generation, &e)
                }
            };

            if events.send(event).await.is_err() {
                tracing::debug!(generation, "advisory receiver dropped; result discarded");
            }
        })
    }
}
