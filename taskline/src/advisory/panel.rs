//! Display state for advisory text.
//!
//! Results are applied last-write-wins in arrival order: a slow response
//! to an older request overwrites a faster response to a newer one. The
//! loading flag stays set while any request is outstanding and is cleared
//! once every request has reported back, whatever the outcome.

use super::service::AdvisoryEvent;

/// Advisory text, error and loading state shown by the UI.
#[derive(Debug, Default)]
pub struct AdvisoryPanel {
    text: Option<String>,
    error: Option<String>,
    in_flight: usize,
    next_generation: u64,
    shown_generation: Option<u64>,
}

impl AdvisoryPanel {
    /// Creates an empty panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new outgoing request and returns its generation.
    ///
    /// Clears the previous error; the previous text stays until replaced.
    pub fn begin_request(&mut self) -> u64 {
        self.next_generation += 1;
        self.in_flight += 1;
        self.error = None;
        self.next_generation
    }

    /// Applies a finished request.
    pub fn apply(&mut self, event: AdvisoryEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let generation = event.generation();
        if self.shown_generation.is_some_and(|shown| generation < shown) {
            tracing::debug!(generation, "applying advisory result older than the one shown");
        }
        self.shown_generation = Some(generation);

        match event {
            AdvisoryEvent::Completed { text, .. } => {
                self.text = Some(text);
                self.error = None;
            }
            AdvisoryEvent::Failed { message, .. } => {
                self.error = Some(message);
            }
        }
    }

    /// Whether at least one request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of outstanding requests.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Most recently applied advice.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Most recently applied error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Generation of the last applied event.
    #[must_use]
    pub const fn shown_generation(&self) -> Option<u64> {
        self.shown_generation
    }
}
