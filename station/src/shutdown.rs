//! Shutdown signal for the polling loop.

use std::{
    ops::Deref,
    sync::{Arc, Condvar, Mutex, PoisonError},
    time::Duration,
};

/// A cloneable, one-way "stop now" flag that sleepers can wait on.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    inner: Arc<ShutdownInner>,
}

impl Shutdown {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Deref for Shutdown {
    type Target = ShutdownInner;

    fn deref(&self) -> &Self::Target {
        self.inner.deref()
    }
}

#[derive(Debug, Default)]
pub struct ShutdownInner {
    requested: Mutex<bool>,
    cv: Condvar,
}

impl ShutdownInner {
    /// Request shutdown and wake every waiter.
    pub fn trigger(&self) {
        let mut g = self.requested.lock().unwrap_or_else(PoisonError::into_inner);
        *g = true;
        self.cv.notify_all();
    }

    /// Returns true iff shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        *self.requested.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for the duration, returning early on shutdown.
    /// Returns true if shutdown has been requested.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let g = self.requested.lock().unwrap_or_else(PoisonError::into_inner);
        let (v, _) = self
            .cv
            .wait_timeout_while(g, duration, |g| !*g)
            .unwrap_or_else(PoisonError::into_inner);
        *v
    }
}
