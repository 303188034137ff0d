//! Stop Signal
//!
//! One-shot flag shared between the orchestrator and the sampler thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable, thread-safe stop flag. Setting it more than once is harmless.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    /// Creates an unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal.
    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns true once the signal has been raised.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
