//! Status delivery port.

use crate::domain::{DeliveryError, StatusEvent};

/// Port for delivering status events to an external collaborator.
///
/// Delivery is best-effort. The core logs and discards every error, so a
/// failing sink never affects focus tracking.
pub trait StatusSink: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &'static str;

    /// Delivers one event.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn send(&self, event: &StatusEvent) -> Result<(), DeliveryError>;
}
