//! Error types for the crate's fallible surface.
//!
//! The reactive core itself is infallible: reads of missing keys yield
//! null, writes always succeed, and wrapping a non-object passes it
//! through. Errors only arise at the JSON ingestion boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The top level of an ingested document was not an object or array.
    #[error("document root is {found}, expected an object or array")]
    NotAnObject { found: &'static str },

    /// The document was not valid JSON, or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
