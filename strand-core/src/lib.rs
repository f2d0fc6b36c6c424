//! Strand Core
//!
//! This crate provides the dependency-tracking engine for the Strand
//! reactive state library. It implements:
//!
//! - Tracked containers whose property reads are observed and whose
//!   property writes notify dependents
//! - A process-wide dependency registry mapping (object, key) pairs to
//!   the computations that depend on them
//! - Derived-value constructs (`Ref`, `computed`, `to_refs`) built on
//!   the same registry hooks
//!
//! The engine is synchronous and single-threaded by intent: a write
//! re-runs every dependent computation before it returns. It exposes
//! raw primitives only — scheduling, batching, and rendering belong to
//! the layers above.
//!
//! # Example
//!
//! ```rust,ignore
//! use strand_core::reactive::{computed, run_effect, Reactive, Value};
//!
//! // Wrap some state
//! let state = Reactive::from_json(r#"{"count": 1}"#)?;
//!
//! // Derive a value from it
//! let doubled = {
//!     let state = state.clone();
//!     computed(move || Value::from(state.get("count").as_int().unwrap() * 2))
//! };
//!
//! // React to changes
//! run_effect({
//!     let doubled = doubled.clone();
//!     move || println!("doubled: {:?}", doubled.get())
//! });
//!
//! // Writes propagate synchronously
//! state.set("count", 5); // prints: doubled: Int(10)
//! ```

pub mod error;
pub mod reactive;

pub use error::Error;
