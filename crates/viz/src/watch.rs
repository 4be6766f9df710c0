//! Polling watcher over the result directory.
//!
//! An alternative to direct notification for deployments where charts may be
//! written by another process.

use crate::error::{VizError, VizResult};
use crate::notify::{ArtifactEvent, ArtifactObserver};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct DirectoryWatcher {
    dir: PathBuf,
    interval: Duration,
    seen: HashMap<String, SystemTime>,
}

impl DirectoryWatcher {
    pub fn new(dir: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            interval,
            seen: HashMap::new(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record what is already present so it is not reported as new.
    pub fn prime(&mut self) -> VizResult<()> {
        self.poll().map(drop)
    }

    /// PNG files that appeared or changed since the last poll, sorted by name.
    pub fn poll(&mut self) -> VizResult<Vec<ArtifactEvent>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(VizError::io(&self.dir, e)),
        };

        let mut current = HashMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| VizError::io(&self.dir, e))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') || !name.ends_with(".png") {
                continue;
            }
            // Vanished between listing and stat.
            let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            current.insert(name, modified);
        }

        let mut events: Vec<ArtifactEvent> = current
            .iter()
            .filter(|(name, modified)| self.seen.get(*name) != Some(*modified))
            .map(|(name, _)| ArtifactEvent {
                file_name: name.clone(),
                path: self.dir.join(name),
            })
            .collect();
        events.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        self.seen = current;
        Ok(events)
    }

    /// Poll forever on the tokio runtime, forwarding events to `observer`.
    pub fn spawn(mut self, observer: Arc<dyn ArtifactObserver>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                match self.poll() {
                    Ok(events) => {
                        for event in &events {
                            observer.artifact_ready(event);
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "result directory poll failed"),
                }
            }
        })
    }
}
