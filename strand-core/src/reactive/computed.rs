//! Computed Values
//!
//! A computed value is a read-only ref maintained by an internally
//! registered effect: whenever any reactive data the getter read is
//! written, the effect re-runs the getter and stores the result back
//! into the ref.
//!
//! Storing the result notifies the ref's own dependents, so computed
//! values chain: a computed reading another computed re-runs when the
//! upstream one changes value.
//!
//! There is no caching beyond the single stored value — the getter runs
//! on every upstream write, eagerly, not on access. It must be a pure,
//! synchronous function of currently-reactive state; a getter that
//! writes back into its own dependencies creates a trigger cycle, which
//! is a caller obligation (the registry's depth guard turns a runaway
//! cycle into a panic).

use super::effect::run_effect;
use super::reference::Ref;
use super::value::Value;

/// Create a ref that automatically recomputes from reactive data.
///
/// Runs `getter` once immediately to populate the ref and record its
/// dependencies, then re-runs it on every write to data it read. The
/// returned ref is read-only by convention: its slot belongs to the
/// internal effect, and external writes to it are not prevented but
/// will be overwritten by the next recomputation.
pub fn computed<F>(getter: F) -> Ref
where
    F: Fn() -> Value + Send + Sync + 'static,
{
    let result = Ref::new(Value::Null);

    // The ref is allocated outside the effect so every run writes the
    // same slot and dependents of the ref survive recomputation.
    let target = result.clone();
    run_effect(move || {
        target.set(getter());
    });

    result
}
