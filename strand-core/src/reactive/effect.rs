//! Effect Runner
//!
//! An effect is a side-effecting computation that re-runs whenever data
//! it read changes.
//!
//! # How Effects Work
//!
//! 1. [`run_effect`] runs the computation immediately, with the tracking
//!    context pointing at it, so every tracked read during the run is
//!    recorded in the dependency registry.
//!
//! 2. When any of those slots is later written, the registry re-invokes
//!    the computation through the same entry point. Each re-run happens
//!    inside a fresh tracking scope, so dependencies are re-recorded on
//!    every run. Stale recordings are never removed; re-recording is
//!    idempotent, so the set only grows when the computation reads keys
//!    it had not read before.
//!
//! # Lifetime
//!
//! The registry holds the computation strongly once it has tracked at
//! least one read. Dropping the returned [`Effect`] handle does not
//! unsubscribe it; there is no unsubscription in this engine. The handle
//! is observational: it exposes the effect's identity and run count.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::context::TrackingScope;

/// Unique identifier for a registered computation.
///
/// Dependent sets are keyed by this ID, which is what makes repeated
/// registration of the same computation for the same slot idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(u64);

impl EffectId {
    /// Generate a new unique effect ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

struct ComputationInner {
    id: EffectId,
    run: Box<dyn Fn() + Send + Sync>,
    run_count: AtomicUsize,
}

/// A registered computation, shared between the effect handle, the
/// tracking context, and the dependent sets in the registry.
#[derive(Clone)]
pub(crate) struct Computation {
    inner: Arc<ComputationInner>,
}

impl Computation {
    pub(crate) fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ComputationInner {
                id: EffectId::new(),
                run: Box::new(run),
                run_count: AtomicUsize::new(0),
            }),
        }
    }

    pub(crate) fn id(&self) -> EffectId {
        self.inner.id
    }

    /// Run the computation inside a tracking scope.
    ///
    /// The scope guard restores the previous tracking state on all exit
    /// paths, so a panicking computation cannot leave itself installed
    /// as the active context.
    pub(crate) fn execute(&self) {
        let _scope = TrackingScope::enter(self.clone());
        (self.inner.run)();
        self.inner.run_count.fetch_add(1, Ordering::Relaxed);
    }

    fn run_count(&self) -> usize {
        self.inner.run_count.load(Ordering::Relaxed)
    }
}

/// Handle to a running effect.
///
/// # Example
///
/// ```rust,ignore
/// let state = Reactive::new_map();
/// state.set("count", 0);
///
/// let effect = run_effect(move || {
///     println!("count is {:?}", state.get("count"));
/// });
///
/// state.set("count", 5); // prints: count is Int(5)
/// assert_eq!(effect.run_count(), 2);
/// ```
#[derive(Clone)]
pub struct Effect {
    computation: Computation,
}

impl Effect {
    /// Get the effect's unique ID.
    pub fn id(&self) -> EffectId {
        self.computation.id()
    }

    /// Get the number of completed runs.
    pub fn run_count(&self) -> usize {
        self.computation.run_count()
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.id())
            .field("run_count", &self.run_count())
            .finish()
    }
}

/// Run `f` once now and re-run it on every future write to data it read.
///
/// The computation executes synchronously before this function returns,
/// recording its dependencies as it reads. Re-runs are synchronous too:
/// they happen inside the write that triggered them.
pub fn run_effect<F>(f: F) -> Effect
where
    F: Fn() + Send + Sync + 'static,
{
    let computation = Computation::new(f);
    debug!(effect = computation.id().raw(), "running effect");
    computation.execute();
    Effect { computation }
}
