//! SHA-256 digests of inputs and artifacts.
//!
//! - `sha256_canonical(..)` hashes JSON values/structs through canonical_json.
//! - `sha256_hex(..)`, `sha256_stream(..)`, `sha256_file(..)` hash raw bytes.
//! - Hex digests are lowercase, 64 chars.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::IoError;

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of `value`.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

pub fn sha256_stream<R: Read>(reader: &mut R) -> Result<String, IoError> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).map_err(|e| IoError::Hash(e.to_string()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn sha256_file(path: &Path) -> Result<String, IoError> {
    let f = File::open(path).map_err(|e| IoError::Hash(format!("{}: {e}", path.display())))?;
    sha256_stream(&mut BufReader::new(f))
}

/// 64 lowercase hex characters.
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f'))
}

/// First `n` chars of a validated digest, for display.
pub fn short_hex(hex64: &str, n: usize) -> Result<&str, IoError> {
    if !is_sha256_hex(hex64) {
        return Err(IoError::Hash(format!("invalid sha256 hex: {hex64}")));
    }
    Ok(&hex64[..n.min(64)])
}
