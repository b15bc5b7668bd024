//! Cooperative cancellation of superseded computations.
//!
//! A [`RecomputeGate`] hands out one [`CancellationToken`] per computation.
//! Starting a new computation bumps the gate's generation, which cancels every
//! earlier token. Kernels poll the token between path batches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::error::SimulationError;

/// Generation counter shared by all computations of one engine.
#[derive(Debug, Clone, Default)]
pub struct RecomputeGate {
    latest: Arc<AtomicU64>,
}

impl RecomputeGate {
    /// Creates a gate at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new computation, cancelling all earlier ones.
    pub fn begin(&self) -> CancellationToken {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        CancellationToken {
            latest: Arc::clone(&self.latest),
            generation,
        }
    }

    /// Cancels whatever computation is in flight.
    pub fn cancel_all(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// Handle checked by long-running kernels.
///
/// # Examples
///
/// ```rust
/// use hedge_pricing::mc::RecomputeGate;
///
/// let gate = RecomputeGate::new();
/// let first = gate.begin();
/// assert!(!first.is_cancelled());
/// let second = gate.begin();
/// assert!(first.is_cancelled());
/// assert!(!second.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    latest: Arc<AtomicU64>,
    generation: u64,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::never()
    }
}

impl CancellationToken {
    /// Standalone token, cancelled only through [`CancellationToken::cancel`].
    pub fn never() -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            generation: 0,
        }
    }

    /// Generation this token belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a newer computation started or `cancel` was called.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.latest.load(Ordering::Acquire) != self.generation
    }

    /// Cancels this token's computation.
    pub fn cancel(&self) {
        // Moving the shared counter off this generation cancels it.
        let _ = self.latest.compare_exchange(
            self.generation,
            self.generation.wrapping_add(1),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// `Err(SimulationError::Cancelled)` once cancelled.
    #[inline]
    pub fn check(&self) -> Result<(), SimulationError> {
        if self.is_cancelled() {
            Err(SimulationError::Cancelled)
        } else {
            Ok(())
        }
    }
}
