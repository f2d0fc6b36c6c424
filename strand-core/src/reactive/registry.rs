//! Dependency Registry
//!
//! The registry is the process-wide store that connects tracked data to
//! the computations depending on it. It maps a tracked object's identity
//! to a map from property key to the set of computations that read that
//! key while active.
//!
//! # How It Works
//!
//! 1. Every tracked container and ref allocates an [`ObjectId`] at
//!    construction.
//!
//! 2. When a slot is read, the owner calls [`track`]. If a computation
//!    is active on the current thread, it is recorded as a dependent of
//!    the (object, key) pair. Recording is idempotent per computation.
//!
//! 3. When a slot changes, the owner calls [`trigger`]. Every recorded
//!    dependent is re-invoked synchronously, exactly once per pass,
//!    through the effect runner, so each re-run re-records its reads.
//!
//! # Ownership
//!
//! The registry never holds the tracked data itself, only its ID. The
//! association cannot extend the data's lifetime, and the storage's drop
//! purges its entries, so the registry does not accumulate dependent
//! sets for dead objects.
//!
//! # Locking
//!
//! Registry locks are held only while the maps are consulted or updated.
//! [`trigger`] snapshots the dependent set and releases the lock before
//! invoking anything, so computations are free to read and write tracked
//! data (including the key that triggered them) without deadlocking.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use indexmap::IndexMap;
use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::context;
use super::effect::{Computation, EffectId};
use super::value::Key;

/// Unique identity of a tracked object (container or ref).
///
/// The registry is keyed by identity, not by value: two structurally
/// equal containers have distinct IDs and independent dependent sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a new unique object ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Computations recorded against one (object, key) pair.
///
/// Keyed by effect ID for set semantics; iteration order is insertion
/// order, which makes notification order deterministic.
type DependentSet = IndexMap<EffectId, Computation>;

type DependentMap = HashMap<ObjectId, HashMap<Key, DependentSet>>;

static DEPENDENTS: OnceLock<RwLock<DependentMap>> = OnceLock::new();

fn dependents() -> &'static RwLock<DependentMap> {
    DEPENDENTS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Bound on reentrant trigger depth before the engine gives up.
///
/// A dependency cycle (a computation writing to data it depends on)
/// recurses through [`trigger`]; the guard turns the eventual stack
/// exhaustion into a diagnostic panic at this depth.
const MAX_TRIGGER_DEPTH: usize = 256;

thread_local! {
    static TRIGGER_DEPTH: Cell<usize> = Cell::new(0);
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        let depth = TRIGGER_DEPTH.with(|d| d.get());
        if depth >= MAX_TRIGGER_DEPTH {
            panic!(
                "trigger depth exceeded {} levels; \
                 a computation appears to write to data it depends on",
                MAX_TRIGGER_DEPTH
            );
        }
        TRIGGER_DEPTH.with(|d| d.set(depth + 1));
        Self
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        TRIGGER_DEPTH.with(|d| d.set(d.get() - 1));
    }
}

/// Record the active computation as a dependent of `(target, key)`.
///
/// No-op when no computation is active on the current thread. Called by
/// tracked containers and refs on every read; custom reactive containers
/// can call it directly to participate in tracking.
pub fn track(target: ObjectId, key: &Key) {
    let Some(computation) = context::current() else {
        return;
    };

    trace!(object = target.raw(), key = %key, effect = computation.id().raw(), "track");

    dependents()
        .write()
        .entry(target)
        .or_default()
        .entry(key.clone())
        .or_default()
        .insert(computation.id(), computation);
}

/// Re-invoke every computation recorded against `(target, key)`.
///
/// No-op when nothing is recorded. Each dependent runs synchronously,
/// once per pass, inside a fresh tracking scope. A dependent that writes
/// further tracked data triggers reentrantly; such chains are bounded by
/// the depth guard, not deduplicated.
pub fn trigger(target: ObjectId, key: &Key) {
    let snapshot: SmallVec<[Computation; 4]> = {
        let map = dependents().read();
        match map.get(&target).and_then(|keys| keys.get(key)) {
            Some(set) => set.values().cloned().collect(),
            None => return,
        }
    };

    if snapshot.is_empty() {
        return;
    }

    trace!(object = target.raw(), key = %key, count = snapshot.len(), "trigger");

    let _depth = DepthGuard::enter();
    for computation in snapshot {
        computation.execute();
    }
}

/// Number of computations currently recorded against `(target, key)`.
pub fn dependent_count(target: ObjectId, key: &Key) -> usize {
    dependents()
        .read()
        .get(&target)
        .and_then(|keys| keys.get(key))
        .map_or(0, |set| set.len())
}

/// Drop every recording for `target`.
///
/// Called when a tracked object's storage is dropped.
pub(crate) fn purge(target: ObjectId) {
    if dependents().write().remove(&target).is_some() {
        debug!(object = target.raw(), "purged registry entries");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::effect::run_effect;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn track_without_active_computation_is_a_noop() {
        let id = ObjectId::new();
        let key = Key::from("k");

        track(id, &key);

        assert_eq!(dependent_count(id, &key), 0);
    }

    #[test]
    fn track_records_the_active_computation_once() {
        let id = ObjectId::new();
        let key = Key::from("k");

        run_effect(move || {
            // Reading the same slot twice must not register twice.
            track(id, &key);
            track(id, &key);
        });

        assert_eq!(dependent_count(id, &Key::from("k")), 1);
    }

    #[test]
    fn trigger_reinvokes_recorded_dependents() {
        let id = ObjectId::new();
        let key = Key::from("k");
        let runs = Arc::new(AtomicI32::new(0));
        let runs_clone = runs.clone();

        run_effect(move || {
            track(id, &key);
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        trigger(id, &Key::from("k"));
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        trigger(id, &Key::from("k"));
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn trigger_on_unknown_target_is_a_noop() {
        trigger(ObjectId::new(), &Key::from("nothing"));
    }

    #[test]
    fn trigger_only_reaches_the_written_key() {
        let id = ObjectId::new();
        let runs = Arc::new(AtomicI32::new(0));
        let runs_clone = runs.clone();

        run_effect(move || {
            track(id, &Key::from("a"));
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });

        trigger(id, &Key::from("b"));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        trigger(id, &Key::from("a"));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn purge_removes_all_recordings_for_a_target() {
        let id = ObjectId::new();
        let key = Key::from("k");

        run_effect(move || track(id, &key));
        assert_eq!(dependent_count(id, &Key::from("k")), 1);

        purge(id);
        assert_eq!(dependent_count(id, &Key::from("k")), 0);
    }
}
