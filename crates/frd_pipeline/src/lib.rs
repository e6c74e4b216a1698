//! frd_pipeline — deterministic pipeline surface (validate → aggregate → distribution defaults → compliance → run record).
//! This crate stays I/O-free apart from the manifest entry point; JSON, schema
//! checks and hashing live in `frd_io`, the fund math in `frd_algo`.

#![forbid(unsafe_code)]

use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use frd_algo::{aggregate, check_compliance, AggregateResult, Finding, Severity};
use frd_core::errors::CoreError;
use frd_core::input::{DistributionData, EmployeeCategory, InputData};
use frd_core::NormativeConstants;
use frd_io::loader::{self, LoadedContext};
use frd_io::IoError;

pub mod distribution;
pub mod run_record;
pub mod validate;

pub use run_record::RunRecordDoc;
pub use validate::{validate, IssueSeverity, ValidationIssue, ValidationReport};

/// Engine identifiers recorded in every run record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

/// Pipeline context: inputs are already loaded and shape-checked by frd_io.
#[derive(Debug)]
pub struct PipelineCtx {
    pub loaded: LoadedContext,
    pub engine_meta: EngineMeta,
}

/// Count of findings per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FindingSummary {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

impl FindingSummary {
    pub fn of(findings: &[Finding]) -> Self {
        findings.iter().fold(Self::default(), |mut s, f| {
            match f.severity {
                Severity::Info => s.info += 1,
                Severity::Warning => s.warning += 1,
                Severity::Error => s.error += 1,
            }
            s
        })
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error > 0
    }
}

/// What one calculation produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutputs {
    pub validation: ValidationReport,
    pub result: AggregateResult,
    pub findings: Vec<Finding>,
    pub summary: FindingSummary,
    /// Distribution record after derived defaults (distribution mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionData>,
}

/// Top-level outputs of a context run: the calculation and its record.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub outputs: RunOutputs,
    pub run_record: RunRecordDoc,
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    /// Input validation failed; the report carries every issue.
    Validate(ValidationReport),
    /// Aggregation refused the data (non-finite amount).
    Aggregate(CoreError),
    /// Loading, schema checks, hashing.
    Io(IoError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Validate(r) => write!(f, "input validation failed: {}", r.error_summary()),
            PipelineError::Aggregate(e) => write!(f, "aggregation failed: {e}"),
            PipelineError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Aggregate(e) => Some(e),
            PipelineError::Io(e) => Some(e),
            PipelineError::Validate(_) => None,
        }
    }
}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        PipelineError::Io(e)
    }
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        PipelineError::Aggregate(e)
    }
}

// ---------- Entry points ----------

/// validate → aggregate → (distribution mode: normalize + derived defaults) → compliance.
pub fn run(input: &InputData, constants: &NormativeConstants) -> Result<RunOutputs, PipelineError> {
    let validation = validate(input);
    if !validation.pass {
        return Err(PipelineError::Validate(validation));
    }

    let result = aggregate(input, constants)?;

    let checked: Cow<'_, InputData> = if input.annual.distribution_mode() {
        let mut owned = input.clone();
        distribution::normalize_for_mode(&mut owned.distribution);
        let headcount = owned.annual.headcount(EmployeeCategory::Dipendente);
        distribution::derive_performance_defaults(&mut owned.distribution, result.employee.total, headcount);
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(input)
    };

    let findings = check_compliance(&result, &checked, constants);
    let summary = FindingSummary::of(&findings);
    tracing::debug!(
        total_fund = result.total_fund,
        info = summary.info,
        warning = summary.warning,
        error = summary.error,
        "run complete"
    );

    let distribution = match checked {
        Cow::Owned(owned) => Some(owned.distribution),
        Cow::Borrowed(_) => None,
    };
    Ok(RunOutputs { validation, result, findings, summary, distribution })
}

/// Run on a loaded context and build the run record.
pub fn run_with_ctx(ctx: PipelineCtx) -> Result<PipelineOutputs, PipelineError> {
    let PipelineCtx { loaded, engine_meta } = ctx;
    let outputs = run(&loaded.input, &loaded.constants)?;
    let subject = run_record::RunSubject {
        reference_year: loaded.input.annual.reference_year,
        entity_name: loaded.input.annual.entity_name.as_deref(),
    };
    let run_record = run_record::build_run_record(
        &engine_meta,
        subject,
        &loaded.digests,
        &outputs.result,
        &outputs.findings,
        outputs.summary,
    )?;
    Ok(PipelineOutputs { outputs, run_record })
}

/// Convenience: manifest path → load → run.
pub fn run_from_manifest_path<P: AsRef<Path>>(path: P) -> Result<PipelineOutputs, PipelineError> {
    let engine_meta = engine_identifiers();
    let loaded = loader::load_from_manifest(path.as_ref(), &engine_meta.version)?;
    run_with_ctx(PipelineCtx { loaded, engine_meta })
}

/// Engine identifiers; overridable at build time through `FRD_ENGINE_*`.
pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        vendor: option_env!("FRD_ENGINE_VENDOR").unwrap_or("frd").to_string(),
        name: option_env!("FRD_ENGINE_NAME").unwrap_or("frd_engine").to_string(),
        version: option_env!("FRD_ENGINE_VERSION")
            .unwrap_or(env!("CARGO_PKG_VERSION"))
            .to_string(),
        build: option_env!("FRD_ENGINE_BUILD").unwrap_or("dev").to_string(),
    }
}

pub mod prelude {
    //! `use frd_pipeline::prelude::*;`
    pub use crate::{
        engine_identifiers, run, run_from_manifest_path, run_with_ctx, EngineMeta, FindingSummary,
        PipelineCtx, PipelineError, PipelineOutputs, RunOutputs, RunRecordDoc, ValidationReport,
    };
}
