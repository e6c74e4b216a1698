//! Run manifest: the two input paths of one calculation, optional expected digests.
//!
//! - Paths are local (no `<scheme>://`) and resolve against the manifest's directory.
//! - Required inputs must exist and be files.
//! - Digests (lowercase 64-hex) are checked over the canonical JSON bytes of each file.
//! - `expect.engine_version`, when present, must match the running engine exactly.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canonical_json::to_canonical_json_bytes;
use crate::hasher::{is_sha256_hex, sha256_hex};
use crate::{looks_like_url, IoError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunManifest {
    /// Free-form label, not used in any artifact digest.
    #[serde(default)]
    pub id: Option<String>,
    pub input_path: String,
    pub normative_path: String,
    #[serde(default)]
    pub inputs_sha256: Option<InputDigests>,
    #[serde(default)]
    pub expect: Option<Expectations>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDigests {
    #[serde(default)]
    pub input_path: Option<String>,
    #[serde(default)]
    pub normative_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expectations {
    #[serde(default)]
    pub engine_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedManifest {
    pub input_path: PathBuf,
    pub normative_path: PathBuf,
    pub digests: Option<InputDigests>,
    pub expect: Option<Expectations>,
}

// ---------- load / validate ----------

pub fn load_manifest(path: &Path) -> Result<RunManifest, IoError> {
    let bytes = fs::read(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let man: RunManifest = serde_json::from_slice(&bytes)?;
    validate_manifest(&man)?;
    Ok(man)
}

pub fn validate_manifest(man: &RunManifest) -> Result<(), IoError> {
    for (label, p) in [("input_path", &man.input_path), ("normative_path", &man.normative_path)] {
        if p.trim().is_empty() {
            return Err(IoError::Manifest(format!("`{label}` must not be empty")));
        }
        if looks_like_url(p) {
            return Err(IoError::Manifest(format!("`{label}` must be a local file path (no URLs): {p}")));
        }
    }
    if let Some(d) = &man.inputs_sha256 {
        for (label, h) in [("input_path", &d.input_path), ("normative_path", &d.normative_path)] {
            if let Some(h) = h {
                if !is_sha256_hex(h) {
                    return Err(IoError::Manifest(format!("invalid sha256 format for {label}: {h}")));
                }
            }
        }
    }
    Ok(())
}

// ---------- resolution ----------

/// Resolve paths against `base_dir` and check both inputs are existing files.
pub fn resolve_paths(base_dir: &Path, man: &RunManifest) -> Result<ResolvedManifest, IoError> {
    let input_path = join_under(base_dir, &man.input_path);
    let normative_path = join_under(base_dir, &man.normative_path);
    must_exist_file("input_path", &input_path)?;
    must_exist_file("normative_path", &normative_path)?;
    Ok(ResolvedManifest {
        input_path,
        normative_path,
        digests: man.inputs_sha256.clone(),
        expect: man.expect.clone(),
    })
}

fn join_under(base: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn must_exist_file(label: &'static str, p: &Path) -> Result<(), IoError> {
    let md = fs::metadata(p).map_err(|e| IoError::Manifest(format!("cannot access {label}: {} ({e})", p.display())))?;
    if !md.is_file() {
        return Err(IoError::Manifest(format!("path is not a file for {label}: {}", p.display())));
    }
    Ok(())
}

// ---------- digests & expectations ----------

/// Check supplied digests over canonical JSON bytes. No digests = Ok.
pub fn verify_digests(resolved: &ResolvedManifest) -> Result<(), IoError> {
    let Some(d) = &resolved.digests else {
        return Ok(());
    };
    if let Some(h) = &d.input_path {
        check_one(&resolved.input_path, h, "input_path")?;
    }
    if let Some(h) = &d.normative_path {
        check_one(&resolved.normative_path, h, "normative_path")?;
    }
    Ok(())
}

fn check_one(path: &Path, expected: &str, label: &'static str) -> Result<(), IoError> {
    let bytes = fs::read(path)?;
    let v: serde_json::Value = serde_json::from_slice(&bytes)?;
    let got = sha256_hex(&to_canonical_json_bytes(&v));
    if got != expected {
        return Err(IoError::Manifest(format!("sha256 mismatch for {label}: expected={expected} got={got}")));
    }
    Ok(())
}

pub fn enforce_expectations(resolved: &ResolvedManifest, engine_version: &str) -> Result<(), IoError> {
    if let Some(want) = resolved.expect.as_ref().and_then(|e| e.engine_version.as_deref()) {
        if want != engine_version {
            return Err(IoError::Manifest(format!(
                "expectation mismatch for engine_version: expected={want} got={engine_version}"
            )));
        }
    }
    Ok(())
}

/// load → validate → resolve (relative to the manifest's directory) → verify digests.
pub fn load_and_resolve(manifest_path: &Path) -> Result<ResolvedManifest, IoError> {
    let man = load_manifest(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let resolved = resolve_paths(base, &man)?;
    verify_digests(&resolved)?;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, v: &serde_json::Value) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, serde_json::to_vec_pretty(v).unwrap()).unwrap();
        p
    }

    #[test]
    fn resolves_relative_paths_and_checks_digests() {
        let dir = tempfile::tempdir().unwrap();
        let input = json!({"historicalData": {}, "annualData": {"annoRiferimento": 2025}});
        write(dir.path(), "input.json", &input);
        write(dir.path(), "normativa.json", &json!({"b": 1, "a": 2}));
        let digest = sha256_hex(&to_canonical_json_bytes(&input));
        let man = write(
            dir.path(),
            "manifest.json",
            &json!({
                "input_path": "input.json",
                "normative_path": "normativa.json",
                "inputs_sha256": { "input_path": digest }
            }),
        );
        let r = load_and_resolve(&man).unwrap();
        assert_eq!(r.input_path, dir.path().join("input.json"));
    }

    #[test]
    fn digest_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "input.json", &json!({}));
        write(dir.path(), "normativa.json", &json!({}));
        let man = write(
            dir.path(),
            "manifest.json",
            &json!({
                "input_path": "input.json",
                "normative_path": "normativa.json",
                "inputs_sha256": { "normative_path": "0".repeat(64) }
            }),
        );
        let err = load_and_resolve(&man).unwrap_err();
        assert!(err.to_string().contains("sha256 mismatch for normative_path"));
    }

    #[test]
    fn urls_and_unknown_fields_are_rejected() {
        let man = RunManifest {
            id: None,
            input_path: "https://example.org/in.json".into(),
            normative_path: "n.json".into(),
            inputs_sha256: None,
            expect: None,
        };
        assert!(validate_manifest(&man).is_err());
        let res: Result<RunManifest, _> =
            serde_json::from_value(json!({"input_path": "a", "normative_path": "b", "extra": 1}));
        assert!(res.is_err());
    }

    #[test]
    fn engine_version_expectation() {
        let r = ResolvedManifest {
            input_path: PathBuf::from("a"),
            normative_path: PathBuf::from("b"),
            digests: None,
            expect: Some(Expectations { engine_version: Some("0.1.0".into()) }),
        };
        assert!(enforce_expectations(&r, "0.1.0").is_ok());
        assert!(enforce_expectations(&r, "0.2.0").is_err());
    }
}
