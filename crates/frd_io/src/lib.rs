//! frd_io — loading, schema checks, canonical JSON and hashing.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Offline only: every input is a local file path.
//! - Details live in submodules; this file holds the error and the prelude.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for frd_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON (de)serialization errors with a JSON Pointer-like location.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Hashing errors (read failures, malformed expected digests).
    #[error("hash error: {0}")]
    Hash(String),

    /// JSON Schema validation failures (first violation).
    #[error("schema error at {pointer}: {msg}")]
    Schema { pointer: String, msg: String },

    /// Run manifest shape or policy violations.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Domain-level rejection of otherwise well-formed data.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps line/column, not a pointer; report at root.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

impl From<frd_core::errors::CoreError> for IoError {
    fn from(e: frd_core::errors::CoreError) -> Self {
        IoError::Invalid(e.to_string())
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;
pub mod manifest;
pub mod schema;

/// Returns true if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url(s: &str) -> bool {
    s.trim().contains("://")
}

pub mod prelude {
    //! `use frd_io::prelude::*;`
    pub use crate::{looks_like_url, IoError, IoResult};

    pub use crate::canonical_json;
    pub use crate::hasher;
    pub use crate::loader;
    pub use crate::manifest;
    pub use crate::schema;

    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::hasher::{sha256_canonical, sha256_file, sha256_hex};
    pub use crate::loader::{load_constants, load_input, LoadedContext};
}
