//! The ingestion cycle: fetch, compute, publish.

use std::sync::Arc;

use aqi::{Snapshot, SnapshotStore};
use chrono::Utc;

use crate::{
    shutdown::Shutdown,
    source::{ReadingSource, SourceError},
    StationSettings,
};

/// Drives a [`ReadingSource`] into a [`SnapshotStore`].
pub struct Station<S> {
    source: S,
    store: SnapshotStore,
    settings: StationSettings,
}

impl<S: ReadingSource> Station<S> {
    pub fn new(source: S, store: SnapshotStore, settings: StationSettings) -> Self {
        Station {
            source,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Run one cycle.
    ///
    /// The whole batch is folded into one snapshot before it is published;
    /// if the fetch fails, nothing is published.
    pub fn run_cycle(&mut self) -> Result<Arc<Snapshot>, SourceError> {
        let mut batch = self.source.fetch()?;
        if batch.location.is_none() {
            batch.location = self.settings.location;
        }
        let snapshot = Snapshot::compute(&batch, Utc::now());
        tracing::info!(
            "AQI {} ({}), dominant {}",
            snapshot
                .overall_index()
                .map_or_else(|| "undefined".to_owned(), |v| format!("{v:.0}")),
            snapshot.category(),
            snapshot
                .dominant()
                .map_or_else(|| "none".to_owned(), |p| p.to_string()),
        );
        Ok(self.store.publish(snapshot))
    }

    /// Run cycles until shutdown is requested, or after one cycle if so configured.
    pub fn run(&mut self, shutdown: &Shutdown) {
        while !shutdown.is_triggered() {
            if let Err(e) = self.run_cycle() {
                tracing::error!("ingestion cycle failed: {}", e);
            }
            if self.settings.once {
                break;
            }
            if shutdown.wait_timeout(self.settings.interval) {
                break;
            }
        }
        tracing::info!("station stopped");
    }
}
