//! SnapshotStore holds the latest snapshot and pushes new ones to subscribers.

use std::{
    fmt::Display,
    ops::Deref,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, ThreadId},
};

use thiserror::Error;

use crate::Snapshot;

/// Failure reported by a subscriber. Logged by the store, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SurfaceError(String);

impl SurfaceError {
    pub fn new(message: impl Display) -> Self {
        SurfaceError(message.to_string())
    }
}

impl From<std::io::Error> for SurfaceError {
    fn from(e: std::io::Error) -> Self {
        SurfaceError::new(e)
    }
}

type Callback = dyn FnMut(&Arc<Snapshot>) -> Result<(), SurfaceError> + Send;

/// Handle for removing a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Shared holder of the most recent [`Snapshot`].
///
/// Cloning a store yields another handle to the same state.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    inner: Arc<StoreInner>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Deref for SnapshotStore {
    type Target = StoreInner;

    fn deref(&self) -> &Self::Target {
        self.inner.deref()
    }
}

struct Subscriber {
    id: u64,
    callback: Arc<Mutex<Callback>>,
}

#[derive(Default)]
pub struct StoreInner {
    latest: Mutex<Option<Arc<Snapshot>>>,
    subscribers: Mutex<Vec<Subscriber>>,
    // Held for the whole of a publish, so notifications go out in publish order.
    publishing: Mutex<()>,
    // Thread currently running a publish, to catch publishes from callbacks.
    publisher: Mutex<Option<ThreadId>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for StoreInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreInner")
            .field("latest", &*lock(&self.latest))
            .field("subscribers", &lock(&self.subscribers).len())
            .finish()
    }
}

/// Lock, ignoring poison: a panicking subscriber must not wedge the store.
fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StoreInner {
    /// Replace the current snapshot, then notify every subscriber with it.
    ///
    /// Subscribers are called in registration order. A subscriber that
    /// returns an error or panics is logged and skipped; the rest are still
    /// notified. Every publish notifies each live subscriber exactly once.
    ///
    /// A subscriber that publishes to the same store from inside a
    /// notification is refused: the nested snapshot is logged and returned,
    /// but neither stored nor delivered.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let me = thread::current().id();
        if *lock(&self.publisher) == Some(me) {
            tracing::warn!(
                "refusing snapshot captured at {}: published from inside a notification",
                snapshot.captured_at()
            );
            return snapshot;
        }

        let _publishing = lock(&self.publishing);
        *lock(&self.publisher) = Some(me);
        *lock(&self.latest) = Some(snapshot.clone());

        // Call outside the list lock so subscribers may (un)subscribe.
        let subscribers: Vec<(u64, Arc<Mutex<Callback>>)> = lock(&self.subscribers)
            .iter()
            .map(|s| (s.id, s.callback.clone()))
            .collect();
        tracing::debug!(
            "publishing snapshot captured at {} to {} subscribers",
            snapshot.captured_at(),
            subscribers.len()
        );

        for (id, callback) in subscribers {
            // Skip anyone removed by an earlier callback of this publish.
            if !lock(&self.subscribers).iter().any(|s| s.id == id) {
                continue;
            }
            let result = catch_unwind(AssertUnwindSafe(|| {
                let mut callback = lock(&callback);
                (&mut *callback)(&snapshot)
            }));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("subscriber {} failed: {}", id, e),
                Err(e) => tracing::error!("subscriber {} panicked: {:?}", id, e),
            }
        }
        *lock(&self.publisher) = None;
        snapshot
    }

    /// Register a callback for every subsequent publish.
    ///
    /// The callback is not called with the current snapshot; read
    /// [`StoreInner::latest`] right after subscribing to pick it up.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&Arc<Snapshot>) -> Result<(), SurfaceError> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.subscribers).push(Subscriber {
            id,
            callback: Arc::new(Mutex::new(callback)),
        });
        tracing::trace!("added subscriber {}", id);
        Subscription(id)
    }

    /// Remove a subscriber. Returns false if it was already removed.
    ///
    /// Takes effect immediately, including for a publish in progress: a
    /// subscriber removed by an earlier callback is not called.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut subscribers = lock(&self.subscribers);
        let before = subscribers.len();
        subscribers.retain(|s| s.id != subscription.0);
        before != subscribers.len()
    }

    /// The most recently published snapshot, if any.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        lock(&self.latest).clone()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}
