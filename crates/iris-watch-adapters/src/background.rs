//! Fire-and-forget delivery on a worker thread.
//!
//! Wraps any [`StatusSink`] so the caller only enqueues. A full queue drops
//! the event instead of waiting, and delivery errors on the worker are
//! logged and discarded.

use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::{Mutex, PoisonError};
use std::thread::JoinHandle;

use iris_watch_core::{DeliveryError, StatusEvent, StatusSink};
use tracing::debug;

/// Events buffered before new ones are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Background delivery wrapper.
pub struct BackgroundSink {
    name: &'static str,
    sender: Mutex<Option<SyncSender<StatusEvent>>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundSink {
    /// Moves `inner` onto a worker thread with a bounded queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be spawned.
    pub fn spawn<S>(inner: S, capacity: usize) -> std::io::Result<Self>
    where
        S: StatusSink + 'static,
    {
        let name = inner.name();
        let (tx, rx) = mpsc::sync_channel::<StatusEvent>(capacity.max(1));

        let worker = std::thread::Builder::new()
            .name(format!("iris-watch-{name}"))
            .spawn(move || {
                for event in rx {
                    if let Err(e) = inner.send(&event) {
                        debug!("Background sink {name} failed: {e}");
                    }
                }
            })?;

        Ok(Self {
            name,
            sender: Mutex::new(Some(tx)),
            worker: Some(worker),
        })
    }

    /// Stops accepting events and waits for queued ones to be delivered.
    pub fn shutdown(&mut self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                debug!("Background sink {} worker panicked", self.name);
            }
        }
    }
}

impl StatusSink for BackgroundSink {
    fn name(&self) -> &'static str {
        self.name
    }

    fn send(&self, event: &StatusEvent) -> Result<(), DeliveryError> {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = guard.as_ref() else {
            return Err(DeliveryError::Queue("sink shut down".into()));
        };
        match sender.try_send(event.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DeliveryError::Queue("queue full".into())),
            Err(TrySendError::Disconnected(_)) => {
                Err(DeliveryError::Queue("worker stopped".into()))
            }
        }
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}
