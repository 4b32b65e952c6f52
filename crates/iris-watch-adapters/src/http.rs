//! HTTP collector adapter.

use std::time::Duration;

use anyhow::{Context, Result};
use iris_watch_core::{DeliveryError, FocusStatus, StatusEvent, StatusSink};
use serde::Serialize;
use tracing::trace;

/// Collector endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:65000/iris-watcher";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Request body accepted by the collector, which reads the status as `state`.
#[derive(Serialize)]
struct CollectorBody<'a> {
    #[serde(flatten)]
    event: &'a StatusEvent,
    state: FocusStatus,
}

impl<'a> From<&'a StatusEvent> for CollectorBody<'a> {
    fn from(event: &'a StatusEvent) -> Self {
        Self {
            event,
            state: event.status,
        }
    }
}

/// Posts each status event as a JSON body.
pub struct HttpStatusSink {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpStatusSink {
    /// Creates a sink posting to `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The collector URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl StatusSink for HttpStatusSink {
    fn name(&self) -> &'static str {
        "http"
    }

    fn send(&self, event: &StatusEvent) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&CollectorBody::from(event))
            .send()
            .map_err(|e| DeliveryError::Network(e.to_string()))?;

        let status = response.status();
        trace!("Collector {} answered {status}", self.endpoint);
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Network(format!(
                "collector returned {status}"
            )))
        }
    }
}
