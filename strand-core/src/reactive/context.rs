//! Tracking Context
//!
//! The tracking context records which computation is currently running.
//! This enables automatic dependency tracking: when a tracked slot is
//! read, the registry can attribute the read to the active computation.
//!
//! # Implementation
//!
//! Each thread holds a single slot for the active computation. The slot
//! is managed exclusively through [`TrackingScope`], an RAII guard that
//! saves the previous occupant on entry and restores it on drop. This
//! gives two guarantees the engine depends on:
//!
//! - The slot is restored on every exit path, including panics inside
//!   the computation. Without this, reads performed after a failed run
//!   would be misattributed to a defunct computation.
//! - A computation that runs while another is mid-execution (a trigger
//!   fired from inside an effect, or an effect created inside another)
//!   restores the outer computation when it finishes, so attribution
//!   stays correct across reentrant runs.

use std::cell::RefCell;

use super::effect::Computation;

thread_local! {
    /// The computation currently recording reads on this thread.
    static ACTIVE: RefCell<Option<Computation>> = RefCell::new(None);
}

/// Guard that restores the previous tracking state when dropped.
pub(crate) struct TrackingScope {
    previous: Option<Computation>,
}

impl TrackingScope {
    /// Install `computation` as the active computation for this thread.
    ///
    /// Reads of tracked slots are attributed to it until the returned
    /// guard is dropped, at which point the previous occupant (if any)
    /// becomes active again.
    pub(crate) fn enter(computation: Computation) -> Self {
        let previous = ACTIVE.with(|slot| slot.borrow_mut().replace(computation));
        Self { previous }
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        ACTIVE.with(|slot| {
            *slot.borrow_mut() = self.previous.take();
        });
    }
}

/// Check whether a computation is currently recording reads.
pub fn is_tracking() -> bool {
    ACTIVE.with(|slot| slot.borrow().is_some())
}

/// Get a handle to the active computation, if any.
pub(crate) fn current() -> Option<Computation> {
    ACTIVE.with(|slot| slot.borrow().clone())
}
