//! Structural & semantic validation of InputData before any computation.
//!
//! Errors block the run; warnings flag data the engine will default or
//! count as entered (out-of-range personnel details, negative amounts).
//! The report is deterministic: issues are sorted by code, then path, then message.

use serde::Serialize;

use frd_algo::descriptors::descriptor;
use frd_core::input::{Art23Employee, EntityType, InputData};
use frd_core::keys::{EqItem, ExecutiveItem, LineItemKey, LineItems};

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// One validation finding. `path` is a JSON-pointer-like location in the input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: &'static str,
    pub message: String,
    pub path: String,
}

/// pass = no Error; issue order is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Error)
    }

    /// `code @ path: message` lines, one per error.
    pub fn error_summary(&self) -> String {
        self.errors()
            .map(|i| format!("{} @ {}: {}", i.code, i.path, i.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Top-level entry point.
pub fn validate(input: &InputData) -> ValidationReport {
    let mut issues = Vec::new();

    check_entity(input, &mut issues);
    check_historical(input, &mut issues);
    check_personnel("/annualData/personale2018PerArt23", &input.annual.personnel_2018, false, &mut issues);
    check_personnel("/annualData/personaleAnnoRifPerArt23", &input.annual.personnel_current, true, &mut issues);
    check_negative_amounts(input, &mut issues);

    sort_issues_stably(&mut issues);

    let report = ValidationReport {
        pass: !issues.iter().any(|i| i.severity == IssueSeverity::Error),
        issues,
    };
    tracing::debug!(pass = report.pass, issues = report.issues.len(), "input validated");
    report
}

// ---------- Checks ----------

fn check_entity(input: &InputData, out: &mut Vec<ValidationIssue>) {
    let annual = &input.annual;
    if is_blank(annual.entity_name.as_deref()) {
        out.push(err(
            "Entity.NameMissing",
            "/annualData/denominazioneEnte",
            "La denominazione dell'ente è obbligatoria.",
        ));
    }
    match annual.entity_type {
        None => out.push(err(
            "Entity.TypeMissing",
            "/annualData/tipologiaEnte",
            "La tipologia di ente è obbligatoria.",
        )),
        Some(EntityType::Altro) if is_blank(annual.other_entity_type.as_deref()) => out.push(err(
            "Entity.OtherTypeUnspecified",
            "/annualData/altroTipologiaEnte",
            "Specificare la tipologia di ente quando si seleziona \"Altro\".",
        )),
        Some(_) => {}
    }
    if annual.has_executives.is_none() {
        out.push(err(
            "Entity.ExecutiveFlagMissing",
            "/annualData/hasDirigenza",
            "Specificare se l'ente ha personale dirigente.",
        ));
    }
}

fn check_historical(input: &InputData, out: &mut Vec<ValidationIssue>) {
    let h = &input.historical;
    if h.employee_fund_2016.is_none() {
        out.push(err(
            "Historical.Fund2016Missing",
            "/historicalData/fondoSalarioAccessorioPersonaleNonDirEQ2016",
            "Il fondo 2016 del personale non dirigente è obbligatorio.",
        ));
    }
    let needs_2018 = input.annual.entity_type.is_some_and(EntityType::needs_2018_baseline);
    if needs_2018 && h.employee_fund_2018.is_none() {
        out.push(err(
            "Historical.Fund2018Missing",
            "/historicalData/fondoPersonaleNonDirEQ2018_Art23",
            "Per Comuni e Province il fondo 2018 del personale non dirigente è obbligatorio.",
        ));
    }
}

fn check_personnel(base: &str, staff: &[Art23Employee], with_payslips: bool, out: &mut Vec<ValidationIssue>) {
    for (i, e) in staff.iter().enumerate() {
        if let Some(p) = e.part_time_pct {
            if !(0.0..=100.0).contains(&p) {
                out.push(warn(
                    "Personnel.PartTimeOutOfRange",
                    format!("{base}/{i}/partTimePercentage"),
                    format!("Percentuale part-time {p} fuori da [0, 100] per '{}': verrà considerato tempo pieno.", e.id),
                ));
            }
        }
        if !with_payslips {
            continue;
        }
        if let Some(n) = e.payslips {
            if !(n > 0.0 && n <= 12.0) {
                out.push(warn(
                    "Personnel.PayslipsOutOfRange",
                    format!("{base}/{i}/cedoliniEmessi"),
                    format!("Cedolini emessi {n} fuori da (0, 12] per '{}': verrà considerato l'anno intero.", e.id),
                ));
            }
        }
    }
}

fn check_negative_amounts(input: &InputData, out: &mut Vec<ValidationIssue>) {
    for (key, v) in input.employee_fund.iter() {
        if v < 0.0 && !descriptor(key).subtractor {
            out.push(negative("fondoAccessorioDipendenteData", key.wire(), v));
        }
    }
    // Outside the employee fund only the cap adjustments subtract.
    negatives_in("fondoElevateQualificazioniData", &input.eq_fund, |k| k == EqItem::AdeguamentoTetto2016, out);
    negatives_in("fondoSegretarioComunaleData", &input.secretary_fund, |_| false, out);
    negatives_in("fondoDirigenzaData", &input.executive_fund, |k| {
        k == ExecutiveItem::MisureMancatoRispettoVincoli
    }, out);
}

fn negatives_in<K: LineItemKey>(
    record: &'static str,
    items: &LineItems<K>,
    is_subtractor: impl Fn(K) -> bool,
    out: &mut Vec<ValidationIssue>,
) {
    for (key, v) in items.iter() {
        if v < 0.0 && !is_subtractor(key) {
            out.push(negative(record, key.wire(), v));
        }
    }
}

fn negative(record: &str, key: &str, v: f64) -> ValidationIssue {
    warn(
        "Amount.Negative",
        format!("/{record}/{key}"),
        format!("Importo negativo ({v}) su una voce che non è una decurtazione."),
    )
}

// ---------- Helpers ----------

fn is_blank(s: Option<&str>) -> bool {
    s.map_or(true, |s| s.trim().is_empty())
}

fn err(code: &'static str, path: impl Into<String>, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue { severity: IssueSeverity::Error, code, message: message.into(), path: path.into() }
}

fn warn(code: &'static str, path: impl Into<String>, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue { severity: IssueSeverity::Warning, code, message: message.into(), path: path.into() }
}

/// Deterministic ordering: by code, then path, then message.
fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| a.path.cmp(&b.path))
            .then_with(|| a.message.cmp(&b.message))
    });
}
