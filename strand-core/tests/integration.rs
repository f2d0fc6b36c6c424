//! Integration Tests for the Reactive Engine
//!
//! These tests exercise the public surface end to end: tracked
//! containers, effects, refs, per-property refs, and computed values
//! working together.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use strand_core::reactive::{
    computed, dependent_count, is_tracking, run_effect, to_refs, track, wrap, Key, Reactive, Value,
};

/// A computation that read a slot while active re-runs exactly once per
/// distinct-value write to that slot.
#[test]
fn tracked_read_reruns_once_per_write() {
    let state = Reactive::from_entries([("count", 0)]);
    let observed = Arc::new(AtomicI32::new(-1));

    let effect = {
        let state = state.clone();
        let observed = observed.clone();
        run_effect(move || {
            if let Some(n) = state.get("count").as_int() {
                observed.store(n as i32, Ordering::SeqCst);
            }
        })
    };

    assert_eq!(observed.load(Ordering::SeqCst), 0);
    assert_eq!(effect.run_count(), 1);

    state.set("count", 1);
    assert_eq!(observed.load(Ordering::SeqCst), 1);
    assert_eq!(effect.run_count(), 2);

    state.set("count", 2);
    assert_eq!(effect.run_count(), 3);
}

/// Writing a strictly equal value must not notify any dependent.
#[test]
fn equal_writes_are_silent() {
    let state = Reactive::from_entries([("name", "ada")]);

    let effect = {
        let state = state.clone();
        run_effect(move || {
            state.get("name");
        })
    };
    assert_eq!(effect.run_count(), 1);

    state.set("name", "ada");
    assert_eq!(effect.run_count(), 1);

    state.set("name", "grace");
    assert_eq!(effect.run_count(), 2);
}

/// Nested containers are wrapped lazily: every access hands out a fresh
/// handle, but all handles alias the same storage and nested reads stay
/// trackable through them.
#[test]
fn nested_wrapping_is_lazy_and_trackable() {
    let state = Reactive::from_json(r#"{"a": {"b": 1}}"#).unwrap();

    assert_eq!(
        state.get("a").as_object().unwrap().get("b"),
        Value::from(1)
    );

    let runs = Arc::new(AtomicI32::new(0));
    let _effect = {
        let state = state.clone();
        let runs = runs.clone();
        run_effect(move || {
            runs.fetch_add(1, Ordering::SeqCst);
            state.get("a").as_object().unwrap().get("b");
        })
    };
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // A write through an independently fetched handle reaches the same
    // storage and re-runs the effect.
    let a = state.get("a");
    a.as_object().unwrap().set("b", 2);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

/// Refs round-trip values and notify once per distinct-value write.
#[test]
fn ref_round_trip() {
    use strand_core::reactive::Ref;

    let r = Ref::new(5);
    assert_eq!(r.get(), Value::from(5));

    r.set(6);
    assert_eq!(r.get(), Value::from(6));

    let effect = {
        let r = r.clone();
        run_effect(move || {
            r.get();
        })
    };
    assert_eq!(effect.run_count(), 1);

    r.set(7);
    r.set(7);
    r.set(8);
    assert_eq!(effect.run_count(), 3);
}

/// Per-property refs keep both directions reactive after the container
/// has been split up.
#[test]
fn to_refs_preserves_reactivity_under_destructuring() {
    let state = Reactive::from_entries([("x", 1)]);
    let mut refs = to_refs(&state);
    let x = refs.swap_remove(&Key::from("x")).unwrap();

    state.set("x", 2);
    assert_eq!(x.get(), Value::from(2));

    x.set(3);
    assert_eq!(state.get("x"), Value::from(3));
}

/// Computed values update on upstream writes with no caller involvement,
/// and chain through each other.
#[test]
fn computed_chains_propagate() {
    let state = Reactive::from_entries([("n", 1)]);

    let doubled = {
        let state = state.clone();
        computed(move || Value::from(state.get("n").as_int().unwrap() * 2))
    };
    assert_eq!(doubled.get(), Value::from(2));

    let quadrupled = {
        let doubled = doubled.clone();
        computed(move || Value::from(doubled.get().as_int().unwrap() * 2))
    };
    assert_eq!(quadrupled.get(), Value::from(4));

    state.set("n", 5);
    assert_eq!(doubled.get(), Value::from(10));
    assert_eq!(quadrupled.get(), Value::from(20));
}

/// Deleting an absent key must not notify; deleting a present, tracked
/// key notifies all recorded dependents exactly once.
#[test]
fn delete_notifies_only_if_key_existed() {
    let state = Reactive::from_entries([("x", 1)]);

    let effect = {
        let state = state.clone();
        run_effect(move || {
            state.get("x");
        })
    };
    assert_eq!(effect.run_count(), 1);

    assert!(!state.remove("y"));
    assert_eq!(effect.run_count(), 1);

    assert!(state.remove("x"));
    assert_eq!(effect.run_count(), 2);
}

/// A panicking computation must not stay installed as the tracking
/// context: reads performed afterwards are unattributed and writes do
/// not resurrect the defunct computation.
#[test]
fn panicking_computation_releases_the_context() {
    let state = Reactive::from_entries([("x", 1)]);
    let runs = Arc::new(AtomicI32::new(0));

    let result = catch_unwind(AssertUnwindSafe(|| {
        let runs = runs.clone();
        run_effect(move || {
            runs.fetch_add(1, Ordering::SeqCst);
            panic!("computation failed");
        });
    }));
    assert!(result.is_err());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(!is_tracking());

    // If the context had leaked, this read would record the defunct
    // computation and the write would re-run it.
    state.get("x");
    state.set("x", 2);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

/// A computation that writes to its own dependency recurses through
/// trigger until the depth guard stops it.
#[test]
#[should_panic(expected = "trigger depth")]
fn cyclic_trigger_hits_the_depth_guard() {
    let state = Reactive::from_entries([("n", 0)]);

    run_effect(move || {
        let n = state.get("n").as_int().unwrap();
        state.set("n", n + 1);
    });
}

/// The registry keeps no recording for dropped objects: dropping the
/// storage purges its dependent sets.
#[test]
fn dropping_tracked_storage_purges_the_registry() {
    let state = Reactive::new_map();
    let id = state.id();
    let key = Key::from("x");

    // Track through the low-level hook so the computation does not keep
    // the storage alive by capturing a handle.
    {
        let key = key.clone();
        run_effect(move || track(id, &key));
    }
    assert_eq!(dependent_count(id, &key), 1);

    drop(state);
    assert_eq!(dependent_count(id, &key), 0);
}

/// Primitives pass through `wrap` unchanged; documents round-trip.
#[test]
fn json_boundary() {
    assert_eq!(wrap(serde_json::json!(5)), Value::from(5));
    assert_eq!(wrap(serde_json::json!(null)), Value::Null);

    let state = Reactive::from_json(r#"{"a": {"b": [1, 2]}}"#).unwrap();
    let text = state.to_json().unwrap();
    let round: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(round, serde_json::json!({"a": {"b": [1, 2]}}));

    assert!(Reactive::from_json("\"scalar\"").is_err());
}

/// An effect created inside another effect must not steal the outer
/// computation's remaining reads: the tracking scope restores the outer
/// computation when the inner one finishes.
#[test]
fn nested_effects_keep_outer_attribution() {
    let state = Reactive::from_entries([("a", 1), ("c", 1)]);
    let outer_runs = Arc::new(AtomicI32::new(0));

    let _outer = {
        let state = state.clone();
        let outer_runs = outer_runs.clone();
        run_effect(move || {
            outer_runs.fetch_add(1, Ordering::SeqCst);
            state.get("a");

            let inner_state = state.clone();
            run_effect(move || {
                inner_state.get("b");
            });

            // Read after the inner effect completed; attribution must
            // still point at the outer computation.
            state.get("c");
        })
    };
    assert_eq!(outer_runs.load(Ordering::SeqCst), 1);

    state.set("c", 2);
    assert_eq!(outer_runs.load(Ordering::SeqCst), 2);
}

/// Writes to keys nobody recorded are notification no-ops, even on
/// objects that have dependents on other keys.
#[test]
fn untracked_keys_do_not_notify() {
    let state = Reactive::from_entries([("watched", 1), ("ignored", 1)]);

    let effect = {
        let state = state.clone();
        run_effect(move || {
            state.get("watched");
        })
    };
    assert_eq!(effect.run_count(), 1);

    state.set("ignored", 99);
    assert_eq!(effect.run_count(), 1);

    state.set("watched", 2);
    assert_eq!(effect.run_count(), 2);
}
