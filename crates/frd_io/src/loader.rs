//! Loader: read the two local JSON documents (input data, normative constants),
//! check them against the embedded schemas, deserialize into typed records and
//! digest their canonical bytes. No network I/O.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use frd_core::{InputData, NormativeConstants};

use crate::schema::{self, SchemaKind};
use crate::{hasher, manifest, IoError};

/// Refuse documents larger than this before parsing.
pub const MAX_DOCUMENT_BYTES: u64 = 16 * 1024 * 1024;

/// SHA-256 (canonical JSON) of the two inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputDigests {
    pub input_sha256: String,
    pub normative_sha256: String,
}

/// Everything one run reads, typed and digested.
#[derive(Debug, Clone)]
pub struct LoadedContext {
    pub input: InputData,
    pub constants: NormativeConstants,
    pub digests: InputDigests,
}

// ---------- Orchestration ----------

pub fn load_context(input_path: &Path, normative_path: &Path) -> Result<LoadedContext, IoError> {
    let (input, input_sha256) = load_typed::<InputData>(input_path, SchemaKind::Input)?;
    let (constants, normative_sha256) = load_typed::<NormativeConstants>(normative_path, SchemaKind::Constants)?;
    tracing::debug!(%input_sha256, %normative_sha256, "inputs loaded");
    Ok(LoadedContext { input, constants, digests: InputDigests { input_sha256, normative_sha256 } })
}

/// Load through a run manifest (paths relative to the manifest file).
pub fn load_from_manifest(manifest_path: &Path, engine_version: &str) -> Result<LoadedContext, IoError> {
    let resolved = manifest::load_and_resolve(manifest_path)?;
    manifest::enforce_expectations(&resolved, engine_version)?;
    load_context(&resolved.input_path, &resolved.normative_path)
}

// ---------- Targeted loaders ----------

pub fn load_input(path: &Path) -> Result<InputData, IoError> {
    load_typed(path, SchemaKind::Input).map(|(v, _)| v)
}

pub fn load_constants(path: &Path) -> Result<NormativeConstants, IoError> {
    load_typed(path, SchemaKind::Constants).map(|(v, _)| v)
}

pub fn parse_input_str(s: &str) -> Result<InputData, IoError> {
    let v: Value = serde_json::from_str(s)?;
    from_checked_value(v, SchemaKind::Input)
}

pub fn parse_constants_str(s: &str) -> Result<NormativeConstants, IoError> {
    let v: Value = serde_json::from_str(s)?;
    from_checked_value(v, SchemaKind::Constants)
}

fn load_typed<T: DeserializeOwned>(path: &Path, kind: SchemaKind) -> Result<(T, String), IoError> {
    let v = read_json_value_with_limits(path)?;
    let digest = hasher::sha256_canonical(&v)?;
    let typed = from_checked_value(v, kind).map_err(|e| with_path(e, path))?;
    Ok((typed, digest))
}

fn from_checked_value<T: DeserializeOwned>(v: Value, kind: SchemaKind) -> Result<T, IoError> {
    schema::validate_value(kind, &v)?;
    serde_json::from_value(v).map_err(|e| IoError::Json { pointer: "/".into(), msg: e.to_string() })
}

fn with_path(e: IoError, path: &Path) -> IoError {
    match e {
        IoError::Json { pointer, msg } => IoError::Json { pointer, msg: format!("{}: {msg}", path.display()) },
        IoError::Schema { pointer, msg } => IoError::Schema { pointer, msg: format!("{}: {msg}", path.display()) },
        other => other,
    }
}

/// Save `input` as a canonical snapshot that [`load_input`] reads back unchanged.
pub fn save_snapshot(path: &Path, input: &InputData) -> Result<String, IoError> {
    crate::canonical_json::write_canonical_file(path, input)?;
    hasher::sha256_canonical(input)
}

/// Read a local JSON file, refusing oversized documents.
pub fn read_json_value_with_limits(path: &Path) -> Result<Value, IoError> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let len = f.metadata()?.len();
    if len > MAX_DOCUMENT_BYTES {
        return Err(IoError::Invalid(format!(
            "{}: document too large ({len} bytes, max {MAX_DOCUMENT_BYTES})",
            path.display()
        )));
    }
    let mut buf = Vec::with_capacity(len as usize);
    f.take(MAX_DOCUMENT_BYTES + 1).read_to_end(&mut buf)?;
    serde_json::from_slice(&buf)
        .map_err(|e| IoError::Json { pointer: "/".into(), msg: format!("{}: {e}", path.display()) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_include;
    use frd_core::keys::EmployeeItem;
    use serde_json::json;
    use std::fs;

    const INPUT: &str = r#"{
        "historicalData": { "fondoSalarioAccessorioPersonaleNonDirEQ2016": 100000 },
        "annualData": { "annoRiferimento": 2025, "denominazioneEnte": "Comune di Prova" },
        "fondoAccessorioDipendenteData": { "st_art79c1b_euro8450": 8450, "st_art79c1c_incrementoStabileConsistenzaPers": null }
    }"#;

    const NORMATIVA: &str = r#"{
        "valori_pro_capite": { "art67_ccnl_2018": 83.2, "art79_ccnl_2022_b": 84.5 },
        "limiti": { "incidenza_salario_accessorio": 48, "incremento_virtuosi_dl25_2025": 48, "incremento_pnrr_dl13_2023": 5 },
        "riferimenti_normativi": { "art23_dlgs75_2017": "Art. 23 c.2 D.Lgs. 75/2017" }
    }"#;

    #[test]
    fn parses_typed_input() {
        let input = parse_input_str(INPUT).unwrap();
        assert_eq!(input.employee_fund.value(EmployeeItem::Euro8450), 8450.0);
        assert_eq!(input.employee_fund.get(EmployeeItem::IncrementoConsistenzaPersonale), None);
    }

    #[test]
    fn unknown_line_item_is_a_json_error() {
        let bad = r#"{ "historicalData": {}, "annualData": { "annoRiferimento": 2025 },
                       "fondoDirigenzaData": { "st_nonEsiste": 1 } }"#;
        assert!(matches!(parse_input_str(bad), Err(IoError::Json { .. })));
    }

    #[test]
    fn load_context_digests_canonical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let ip = dir.path().join("input.json");
        let np = dir.path().join("normativa.json");
        fs::write(&ip, INPUT).unwrap();
        fs::write(&np, NORMATIVA).unwrap();
        let ctx = load_context(&ip, &np).unwrap();
        assert_eq!(ctx.constants.limits.min_individual_performance_pct, 30.0);
        let v: Value = serde_json::from_str(INPUT).unwrap();
        assert_eq!(ctx.digests.input_sha256, hasher::sha256_canonical(&v).unwrap());
    }

    #[test]
    fn snapshot_reloads_to_the_same_record() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("snap").join("input.snapshot.json");
        let input = parse_input_str(INPUT).unwrap();
        let digest = save_snapshot(&p, &input).unwrap();
        let back = load_input(&p).unwrap();
        assert_eq!(back, input);
        assert_eq!(digest, hasher::sha256_file(&p).unwrap());
    }

    #[test]
    fn snapshot_keeps_the_wire_names() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("input.snapshot.json");
        save_snapshot(&p, &parse_input_str(INPUT).unwrap()).unwrap();
        let on_disk: Value = serde_json::from_slice(&fs::read(&p).unwrap()).unwrap();
        assert_json_include!(
            actual: on_disk,
            expected: json!({
                "historicalData": { "fondoSalarioAccessorioPersonaleNonDirEQ2016": 100000.0 },
                "annualData": { "annoRiferimento": 2025, "denominazioneEnte": "Comune di Prova" },
                "fondoAccessorioDipendenteData": { "st_art79c1b_euro8450": 8450.0 }
            })
        );
    }

    #[test]
    fn missing_file_is_a_path_error() {
        let err = load_input(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, IoError::Path(_)));
    }
}
