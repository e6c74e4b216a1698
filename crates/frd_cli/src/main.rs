// crates/frd_cli/src/main.rs
//
// Exit codes, typed error mapping, CLI parsing, the validate-only
// short-circuit and the full run path
// (engine meta → load → pipeline → artifacts → optional rendering).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad flags, schema/JSON shape, manifest, input validation.
    pub const VALIDATION: i32 = 2;
    /// The checker reported errors and `--fail-on-error` was given.
    pub const COMPLIANCE: i32 = 3;
    pub const IO: i32 = 4;
    /// Aggregation refused the data or a report could not be built.
    pub const ENGINE: i32 = 5;
}

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args};

use frd_core::money::format_eur;
use frd_io::loader::{self, LoadedContext};
use frd_io::{canonical_json, IoError};
use frd_pipeline::{engine_identifiers, run_with_ctx, PipelineCtx, PipelineError, PipelineOutputs, ValidationReport};
use frd_report::{build_model, ReportError, ReportModel};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Compliance(usize),
    Io(String),
    Engine(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Compliance(n) => write!(f, "compliance check reported {n} error(s)"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Engine(m) => write!(f, "engine: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("frd: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_tracing(&args);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("frd: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr only; `RUST_LOG` overrides the flag-derived level.
fn init_tracing(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// Map our typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Compliance(_) => COMPLIANCE,
        MainError::Io(_) => IO,
        MainError::Engine(_) => ENGINE,
    }
}

fn map_io_err(e: IoError) -> MainError {
    use IoError::*;
    match e {
        Schema { pointer, msg } => MainError::Validation(format!("schema {pointer}: {msg}")),
        Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        Manifest(m) => MainError::Validation(format!("manifest: {m}")),
        Hash(m) => MainError::Validation(format!("hash: {m}")),
        Invalid(m) => MainError::Validation(format!("invalid: {m}")),
        Path(m) => MainError::Io(format!("path: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Validate(report) => {
            print_issues(&report);
            MainError::Validation(format!("{} error(s) in input", report.errors().count()))
        }
        PipelineError::Aggregate(e) => MainError::Engine(e.to_string()),
        PipelineError::Io(e) => map_io_err(e),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    use ReportError::*;
    match e {
        Template(m) => MainError::Engine(format!("report template: {m}")),
        MissingField(m) => MainError::Engine(format!("report missing: {m}")),
        Inconsistent(m) => MainError::Engine(format!("report inconsistent: {m}")),
    }
}

fn print_issues(report: &ValidationReport) {
    for i in &report.issues {
        tracing::warn!(code = i.code, path = %i.path, severity = ?i.severity, "{}", i.message);
    }
}

fn load(args: &Args, engine_version: &str) -> Result<LoadedContext, MainError> {
    let loaded = match (&args.manifest, &args.input, &args.normative) {
        (Some(manifest), _, _) => loader::load_from_manifest(manifest, engine_version),
        (None, Some(input), Some(normative)) => loader::load_context(input, normative),
        _ => return Err(MainError::Validation("--input and --normative are required".into())),
    };
    loaded.map_err(map_io_err)
}

// ---------- validate-only ----------

/// Load + schema + input validation. The report goes to stdout as JSON.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let loaded = load(args, &engine_identifiers().version)?;
    let report = frd_pipeline::validate(&loaded.input);
    if !args.quiet {
        let json = serde_json::to_string_pretty(&report).map_err(|e| MainError::Engine(e.to_string()))?;
        println!("{json}");
    }
    if report.pass {
        Ok(())
    } else {
        print_issues(&report);
        Err(MainError::Validation(report.error_summary()))
    }
}

// ---------- full run ----------

fn run_once(args: &Args) -> Result<(), MainError> {
    let engine_meta = engine_identifiers();
    let loaded = load(args, &engine_meta.version)?;

    if args.snapshot {
        let path = args.out.join("input.snapshot.json");
        let digest = loader::save_snapshot(&path, &loaded.input).map_err(map_io_err)?;
        tracing::debug!(%digest, "input snapshot written");
    }

    let outs = run_with_ctx(PipelineCtx { loaded, engine_meta }).map_err(map_pipeline_err)?;
    write_artifacts(&args.out, &outs)?;
    maybe_render_reports(args, &outs)?;

    let s = outs.outputs.summary;
    if !args.quiet {
        eprintln!(
            "frd: total fund {} · findings: {} error, {} warning, {} info · artifacts in {}",
            format_eur(outs.outputs.result.total_fund),
            s.error,
            s.warning,
            s.info,
            args.out.display()
        );
    }
    if args.fail_on_error && s.has_errors() {
        return Err(MainError::Compliance(s.error));
    }
    Ok(())
}

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    write_artifact(out_dir, "result.json", &outs.outputs.result)?;
    write_artifact(out_dir, "findings.json", &outs.outputs.findings)?;
    write_artifact(out_dir, "run_record.json", &outs.run_record)?;
    if let Some(dist) = &outs.outputs.distribution {
        write_artifact(out_dir, "distribution.json", dist)?;
    }
    Ok(())
}

fn write_artifact<T: Serialize>(out_dir: &Path, name: &str, value: &T) -> Result<(), MainError> {
    canonical_json::write_canonical_file(&out_dir.join(name), value)
        .map_err(|e| MainError::Io(format!("write {name}: {e}")))
}

fn maybe_render_reports(args: &Args, outs: &PipelineOutputs) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }
    let to_value = |what: &str, r: Result<serde_json::Value, serde_json::Error>| {
        r.map_err(|e| MainError::Engine(format!("{what} to JSON: {e}")))
    };
    let result = to_value("result", serde_json::to_value(&outs.outputs.result))?;
    let findings = to_value("findings", serde_json::to_value(&outs.outputs.findings))?;
    let run = to_value("run_record", serde_json::to_value(&outs.run_record))?;
    let model = build_model(&result, &findings, &run).map_err(map_report_err)?;

    for fmt in &args.render {
        match fmt.as_str() {
            "json" => render_json_report(&model, &args.out)?,
            "html" => render_html_report(&model, &args.out)?,
            other => return Err(MainError::Validation(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

fn render_json_report(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        let text = frd_report::render_json(model).map_err(map_report_err)?;
        write_report(&out_dir.join("report.json"), text)
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = (model, out_dir);
        Err(MainError::Engine("json renderer not enabled (build with feature `report-json`)".into()))
    }
}

fn render_html_report(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-html")]
    {
        let html = frd_report::render_html(model).map_err(map_report_err)?;
        write_report(&out_dir.join("report.html"), html)
    }
    #[cfg(not(feature = "report-html"))]
    {
        let _ = (model, out_dir);
        Err(MainError::Engine("html renderer not enabled (build with feature `report-html`)".into()))
    }
}

#[cfg(any(feature = "report-json", feature = "report-html"))]
fn write_report(path: &Path, text: String) -> Result<(), MainError> {
    canonical_json::write_atomic(path, text.as_bytes())
        .map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))
}
