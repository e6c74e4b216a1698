//! Run record: who computed what from which inputs.
//!
//! - Input digests are SHA-256 over the canonical JSON of the two documents.
//! - Output digests are SHA-256 over the canonical JSON of `result.json` and
//!   `findings.json` exactly as the CLI writes them.
//! - The run id is `RUN:` + SHA-256 of the canonical record without its id.
//! - The timestamp is a fixed placeholder so identical inputs give
//!   byte-identical records.

use serde::Serialize;

use frd_algo::{AggregateResult, Finding};
use frd_io::hasher::sha256_canonical;
use frd_io::loader::InputDigests;
use frd_io::IoError;

use crate::{EngineMeta, FindingSummary};

pub const RUN_RECORD_FORMAT: &str = "frd.run_record/1";
pub const PLACEHOLDER_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecordDoc {
    pub id: String,
    pub format: String,
    pub timestamp_utc: String,
    pub engine: EngineMeta,
    pub reference_year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    pub inputs: InputDigests,
    pub outputs: OutputDigests,
    pub summary: FindingSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDigests {
    pub result_sha256: String,
    pub findings_sha256: String,
}

#[derive(Serialize)]
struct RecordNoId<'a> {
    format: &'a str,
    timestamp_utc: &'a str,
    engine: &'a EngineMeta,
    reference_year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_name: Option<&'a str>,
    inputs: &'a InputDigests,
    outputs: &'a OutputDigests,
    summary: &'a FindingSummary,
}

pub fn output_digests(result: &AggregateResult, findings: &[Finding]) -> Result<OutputDigests, IoError> {
    Ok(OutputDigests {
        result_sha256: sha256_canonical(result)?,
        findings_sha256: sha256_canonical(&findings)?,
    })
}

/// Which entity and year a record is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSubject<'a> {
    pub reference_year: u16,
    pub entity_name: Option<&'a str>,
}

pub fn build_run_record(
    engine: &EngineMeta,
    subject: RunSubject<'_>,
    inputs: &InputDigests,
    result: &AggregateResult,
    findings: &[Finding],
    summary: FindingSummary,
) -> Result<RunRecordDoc, IoError> {
    let outputs = output_digests(result, findings)?;
    let id = {
        let body = RecordNoId {
            format: RUN_RECORD_FORMAT,
            timestamp_utc: PLACEHOLDER_TIMESTAMP,
            engine,
            reference_year: subject.reference_year,
            entity_name: subject.entity_name,
            inputs,
            outputs: &outputs,
            summary: &summary,
        };
        format!("RUN:{}", sha256_canonical(&body)?)
    };
    Ok(RunRecordDoc {
        id,
        format: RUN_RECORD_FORMAT.to_string(),
        timestamp_utc: PLACEHOLDER_TIMESTAMP.to_string(),
        engine: engine.clone(),
        reference_year: subject.reference_year,
        entity_name: subject.entity_name.map(str::to_string),
        inputs: inputs.clone(),
        outputs,
        summary,
    })
}
