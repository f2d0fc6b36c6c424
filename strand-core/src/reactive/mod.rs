//! Reactive Primitives
//!
//! This module implements the dependency-tracking core: tracked
//! containers, effects, refs, per-property refs, and computed values.
//!
//! # Concepts
//!
//! ## Tracked containers
//!
//! A [`Reactive`] wraps a map or list so reads and writes are
//! intercepted. When a slot is read inside a running effect, the effect
//! is recorded as a dependent of that (object, key) pair. When a slot's
//! value changes, all recorded dependents re-run.
//!
//! ## Effects
//!
//! [`run_effect`] runs a computation once, recording what it reads, and
//! re-runs it synchronously on every future write to that data. Effects
//! synchronize reactive state with the outside world.
//!
//! ## Refs and computed values
//!
//! A [`Ref`] is a single tracked slot, for values that do not live in a
//! container. [`computed`] derives a ref from other reactive data and
//! keeps it up to date automatically. [`to_refs`] splits a container
//! into per-property accessors that survive being moved around.
//!
//! # Implementation Notes
//!
//! Dependency detection is automatic: a thread-local tracking context
//! remembers which computation is running, and every tracked read
//! attributes itself to that computation through the process-wide
//! dependency registry. This approach (sometimes called "transparent
//! reactivity") is the one used by Vue 3, SolidJS, and Leptos.
//!
//! Propagation is synchronous and unscheduled: a write re-runs its
//! dependents before returning, and chains of dependent writes recurse.
//! There is no batching, no async dispatch, and no unsubscription —
//! once a computation has been recorded for a key, only the tracked
//! object's drop removes the recording.

mod computed;
mod context;
mod effect;
mod reference;
mod registry;
mod store;
mod to_refs;
mod value;

pub use computed::computed;
pub use context::is_tracking;
pub use effect::{run_effect, Effect, EffectId};
pub use reference::{Ref, RefOps};
pub use registry::{dependent_count, track, trigger, ObjectId};
pub use store::{wrap, ObjectKind, Reactive};
pub use to_refs::{to_refs, PropRef};
pub use value::{Key, Value};
