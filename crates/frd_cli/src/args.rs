// crates/frd_cli/src/args.rs
//
// Offline CLI argument surface plus the checks that run before any loading:
// - No networked paths (reject any scheme:// like http/https/file)
// - Exactly one of: --manifest  XOR  (--input + --normative)
// - Output: --out dir, --render [json|html]*
// - --validate-only loads and validates the input without computing the fund

use std::{
    env, fs,
    io::Read,
    path::{Path, PathBuf},
};

use clap::Parser;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "frd",
    version,
    disable_help_subcommand = true,
    about = "Offline calculator and compliance checker for the fondo risorse decentrate"
)]
pub struct Args {
    // --- Mode selection ---
    /// Path to a run manifest JSON naming the two inputs (mutually exclusive with --input/--normative).
    #[arg(long, conflicts_with_all = ["input", "normative"])]
    pub manifest: Option<PathBuf>,

    // --- Explicit mode ---
    /// Fund input JSON (historicalData, annualData, fund records, distribution).
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Normative constants JSON (normativa.json shape).
    #[arg(long)]
    pub normative: Option<PathBuf>,

    // --- Output & rendering ---
    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Report renderer(s) to emit. Choose up to 2 (json, html). Omit to skip rendering.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,
    /// Also write the canonical input snapshot (input.snapshot.json).
    #[arg(long)]
    pub snapshot: bool,

    // --- Control ---
    /// Validate the input only; do not compute the fund.
    #[arg(long)]
    pub validate_only: bool,
    /// Exit with code 3 when the checker reports at least one error finding.
    #[arg(long)]
    pub fail_on_error: bool,
    /// Only errors on stderr.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Debug-level logs on stderr (RUST_LOG still wins).
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Errors surfaced by argument checking. Messages are short and stable.
#[derive(Debug)]
pub enum CliError {
    Missing(&'static str),
    NonLocalPath(String),
    NotFound(String),
    ManifestQuick(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Missing(s) => write!(f, "missing required flag: {s}"),
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            ManifestQuick(s) => write!(f, "manifest quick-check failed: {s}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    check(Args::parse())
}

/// Scheme checks, mode checks and path normalization on parsed arguments.
pub fn check(mut args: Args) -> Result<Args, CliError> {
    for p in iter_all_paths(&args) {
        ensure_local_path(p)?;
    }

    if args.manifest.is_some() {
        validate_manifest_mode(&args)?;
        args.manifest = args.manifest.take().map(|p| normalize_path(&p));
    } else {
        validate_explicit_mode(&args)?;
        args.input = args.input.take().map(|p| normalize_path(&p));
        args.normative = args.normative.take().map(|p| normalize_path(&p));
    }

    // The output directory may not exist yet.
    args.out = normalize_path(&args.out);
    Ok(args)
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    frd_io::looks_like_url(&lower) || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        args.manifest.as_deref(),
        args.input.as_deref(),
        args.normative.as_deref(),
        Some(args.out.as_path()),
    ]
    .into_iter()
    .flatten()
}

fn validate_manifest_mode(a: &Args) -> Result<(), CliError> {
    let path = a.manifest.as_ref().ok_or(CliError::Missing("--manifest"))?;
    ensure_local_exists(path, "--manifest")?;

    const MAX_BYTES: u64 = 1024 * 1024;
    let f = fs::File::open(path).map_err(|_| CliError::NotFound(format!("--manifest {}", path.display())))?;
    let mut buf = Vec::new();
    f.take(MAX_BYTES)
        .read_to_end(&mut buf)
        .map_err(|_| CliError::ManifestQuick("unable to read manifest file"))?;
    quick_check_manifest_bytes(&buf)
}

fn validate_explicit_mode(a: &Args) -> Result<(), CliError> {
    let input = a.input.as_ref().ok_or(CliError::Missing("--input (or --manifest)"))?;
    let normative = a.normative.as_ref().ok_or(CliError::Missing("--normative"))?;
    ensure_local_exists(input, "--input")?;
    ensure_local_exists(normative, "--normative")
}

fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    match fs::metadata(p) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(CliError::NotFound(format!("{label} {}", p.display()))),
    }
}

/// Best-effort absolute path; falls back to CWD-relative when canonicalize fails.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}

/// Lightweight manifest check before the real parse:
/// - "input_path" and "normative_path" present
/// - no "http://", "https://" or "file://" anywhere
pub fn quick_check_manifest_bytes(bytes: &[u8]) -> Result<(), CliError> {
    let text = std::str::from_utf8(bytes).map_err(|_| CliError::ManifestQuick("manifest must be UTF-8"))?;
    if !text.contains("\"input_path\"") {
        return Err(CliError::ManifestQuick("missing input_path"));
    }
    if !text.contains("\"normative_path\"") {
        return Err(CliError::ManifestQuick("missing normative_path"));
    }
    if text.contains("http://") || text.contains("https://") || text.contains("file://") {
        return Err(CliError::ManifestQuick("URLs are not allowed (offline only)"));
    }
    Ok(())
}
