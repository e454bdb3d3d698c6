//! Display surfaces: consumers of published snapshots.

use std::{
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

use aqi::{Snapshot, SnapshotStore, Subscription, SurfaceError};

/// Something that shows snapshots.
pub trait Surface: Send + 'static {
    /// Show the given snapshot, replacing whatever was shown before.
    fn show(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError>;
}

/// Subscribe a surface to the store, and show the current snapshot right away
/// if there is one.
///
/// The surface is held locked while the current snapshot is read and shown,
/// so a concurrent publish is shown after it, never before.
pub fn attach<S: Surface>(store: &SnapshotStore, surface: S) -> Subscription {
    let surface = Arc::new(Mutex::new(surface));
    let mut guard = surface.lock().unwrap_or_else(PoisonError::into_inner);
    let subscription = {
        let surface = surface.clone();
        store.subscribe(move |snapshot| {
            surface
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .show(snapshot)
        })
    };
    if let Some(latest) = store.latest() {
        if let Err(e) = guard.show(&latest) {
            tracing::warn!("surface failed to show the current snapshot: {}", e);
        }
    }
    subscription
}

fn or_dash(v: Option<f64>, precision: usize) -> String {
    v.map_or_else(|| "-".to_owned(), |v| format!("{v:.precision$}"))
}

/// Logs each snapshot.
pub struct LogSurface;

impl Surface for LogSurface {
    fn show(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        tracing::info!(
            "air quality: index {} ({}); {}",
            or_dash(snapshot.overall_index(), 0),
            snapshot.category(),
            snapshot.advisory()
        );
        for (pollutant, value) in snapshot.sub_indices() {
            tracing::debug!("  {:>5}: {:.0}", pollutant, value);
        }
        tracing::info!(
            "weather: {} °C, {}% RH",
            or_dash(snapshot.temperature(), 1),
            or_dash(snapshot.relative_humidity(), 0)
        );
        Ok(())
    }
}

/// Writes each snapshot as a line of JSON.
pub struct JsonLinesSurface<W> {
    out: W,
}

impl<W> JsonLinesSurface<W> {
    pub fn new(out: W) -> Self {
        JsonLinesSurface { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> Surface for JsonLinesSurface<W> {
    fn show(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        serde_json::to_writer(&mut self.out, snapshot).map_err(SurfaceError::new)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
