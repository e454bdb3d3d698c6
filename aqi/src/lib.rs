//! Air quality index computation.
//!
//! Converts pollutant concentrations into per-pollutant sub-indices via
//! breakpoint interpolation, folds them into an overall index and category,
//! and holds the latest result in a [`SnapshotStore`] that display surfaces
//! subscribe to.
//!
//! Everything in this crate is synchronous and does no I/O; fetching readings
//! is left to the caller.

mod error;
pub mod classify;
pub mod pollutant;
pub mod snapshot;
pub mod store;
pub mod subindex;
pub mod tables;

pub use classify::{advisory, aggregate, classify, Aggregate, Category};
pub use error::AqiError;
pub use pollutant::Pollutant;
pub use snapshot::{Location, RawReading, ReadingBatch, Snapshot};
pub use store::{SnapshotStore, Subscription, SurfaceError};
pub use subindex::{compute_sub_index, sub_index};
pub use tables::{BreakpointTable, Segment};
