//! Cooperative cancellation.
//!
//! The engine polls a [`CancelSignal`] once per iteration, so a cancel
//! request is honoured within one expansion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something the search can ask "should I stop?".
pub trait CancelSignal: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

impl<C: CancelSignal + ?Sized> CancelSignal for &C {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<C: CancelSignal + ?Sized> CancelSignal for Arc<C> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// A signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared cancel flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
