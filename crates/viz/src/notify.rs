//! Notification of newly written artifacts.

use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::broadcast;

/// A chart file that has just been written completely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactEvent {
    pub file_name: String,
    pub path: PathBuf,
}

/// Receives one call per completed artifact.
pub trait ArtifactObserver: Send + Sync {
    fn artifact_ready(&self, event: &ArtifactEvent);
}

impl<F> ArtifactObserver for F
where
    F: Fn(&ArtifactEvent) + Send + Sync,
{
    fn artifact_ready(&self, event: &ArtifactEvent) {
        self(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ArtifactObserver for NoopObserver {
    fn artifact_ready(&self, _event: &ArtifactEvent) {}
}

/// Fans events out to any number of async subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastObserver {
    sender: broadcast::Sender<ArtifactEvent>,
}

impl BroadcastObserver {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ArtifactEvent> {
        self.sender.subscribe()
    }
}

impl ArtifactObserver for BroadcastObserver {
    fn artifact_ready(&self, event: &ArtifactEvent) {
        if self.sender.send(event.clone()).is_err() {
            tracing::trace!(file = %event.file_name, "no subscribers for artifact event");
        }
    }
}
