//! frd_report — offline report model + renderers (JSON/HTML).
//!
//! Determinism rules:
//! - No I/O here. Callers supply the artifacts already parsed.
//! - Nothing is recomputed: amounts come from `result.json`, findings from
//!   `findings.json`, digests from `run_record.json`.
//! - Stable section order and field names; euro amounts in Italian format.
//!
//! Inputs are accepted as `serde_json::Value` so a report can be rebuilt from
//! the files on disk without the pipeline types.

#![forbid(unsafe_code)]

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use frd_core::money::format_eur;

// ---- Artifact type aliases ----
pub type ResultArtifact = Value;
pub type FindingsArtifact = Value;
pub type RunRecordArtifact = Value;

// ===== Errors =====
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    Template(&'static str),
    MissingField(&'static str),
    Inconsistent(&'static str),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Template(s) => write!(f, "report template error: {s}"),
            ReportError::MissingField(p) => write!(f, "report input missing field: {p}"),
            ReportError::Inconsistent(s) => write!(f, "report inputs disagree: {s}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ===== Model =====
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportModel {
    pub cover: SectionCover,
    pub sub_funds: SectionSubFunds,
    pub limit: SectionLimit,
    pub findings: Vec<FindingGroup>,
    pub integrity: SectionIntegrity,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionCover {
    pub title: String,
    pub entity: String,
    pub reference_year: u64,
    pub total_fund: String,
    pub outcome: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubFundRow {
    pub label: String,
    pub stable: String,
    pub variable: String,
    pub total: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionSubFunds {
    pub rows: Vec<SubFundRow>,
    pub totals: SubFundRow,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdjustmentRow {
    pub description: String,
    pub amount: String,
    pub citation: String,
}

/// Art. 23 c.2 panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionLimit {
    pub baseline_2016: String,
    pub adjustment: Option<AdjustmentRow>,
    pub adjusted_limit: String,
    pub subject_to_limit: String,
    pub overage: Option<String>,
    pub within_limit: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FindingRow {
    pub id: String,
    pub description: String,
    pub current_value: String,
    pub limit: String,
    pub message: String,
    pub citation: String,
}

/// Findings of one severity, in checker order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FindingGroup {
    pub severity: String,
    pub title: String,
    pub items: Vec<FindingRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionIntegrity {
    pub run_id: String,
    pub format: String,
    pub timestamp_utc: String,
    pub engine_vendor: String,
    pub engine_name: String,
    pub engine_version: String,
    pub engine_build: String,
    pub input_sha256: String,
    pub normative_sha256: String,
    pub result_sha256: String,
    pub findings_sha256: String,
}

const SUB_FUNDS: [(&str, &str); 4] = [
    ("employee", "Personale non dirigente"),
    ("eq", "Elevate Qualificazioni"),
    ("secretary", "Segretario comunale"),
    ("executive", "Dirigenza"),
];

/// Severity token, group heading. Errors first.
const SEVERITY_GROUPS: [(&str, &str); 3] = [
    ("error", "Errori"),
    ("warning", "Avvisi"),
    ("info", "Informazioni"),
];

// ===== Builder =====

/// Build the report model from the three run artifacts.
///
/// Missing required fields yield `ReportError::MissingField`; a run record
/// whose finding counts do not match `findings.json` yields
/// `ReportError::Inconsistent`.
pub fn build_model(
    result: &ResultArtifact,
    findings: &FindingsArtifact,
    run: &RunRecordArtifact,
) -> Result<ReportModel, ReportError> {
    let findings_arr = findings
        .as_array()
        .ok_or(ReportError::Inconsistent("findings:not_array"))?;
    let groups = group_findings(findings_arr)?;
    check_summary(run, &groups)?;

    let cover = build_cover(result, run, &groups)?;
    let sub_funds = build_sub_funds(result)?;
    let limit = build_limit(result)?;
    let integrity = build_integrity(run)?;

    Ok(ReportModel {
        cover,
        sub_funds,
        limit,
        findings: groups.into_iter().filter(|g| !g.items.is_empty()).collect(),
        integrity,
    })
}

fn build_cover(result: &Value, run: &Value, groups: &[FindingGroup]) -> Result<SectionCover, ReportError> {
    let count = |sev: &str| groups.iter().find(|g| g.severity == sev).map_or(0, |g| g.items.len());
    let outcome = match (count("error"), count("warning")) {
        (0, 0) => "Conforme",
        (0, _) => "Conforme con avvisi",
        _ => "Non conforme",
    };
    Ok(SectionCover {
        title: "Fondo risorse decentrate".to_string(),
        entity: json_get_str(run, "/entity_name").unwrap_or_else(|_| "Ente non indicato".into()),
        reference_year: json_get_u64(run, "/reference_year")?,
        total_fund: format_eur(json_get_f64(result, "/total_fund")?),
        outcome: outcome.to_string(),
    })
}

fn build_sub_funds(result: &Value) -> Result<SectionSubFunds, ReportError> {
    let mut rows = Vec::with_capacity(SUB_FUNDS.len());
    for (key, label) in SUB_FUNDS {
        let node = result.get(key).ok_or(ReportError::MissingField(key))?;
        rows.push(SubFundRow {
            label: label.to_string(),
            stable: format_eur(json_get_f64(node, "/stable")?),
            variable: format_eur(json_get_f64(node, "/variable")?),
            total: format_eur(json_get_f64(node, "/total")?),
        });
    }
    let totals = SubFundRow {
        label: "Totale".to_string(),
        stable: format_eur(json_get_f64(result, "/total_stable")?),
        variable: format_eur(json_get_f64(result, "/total_variable")?),
        total: format_eur(json_get_f64(result, "/total_fund")?),
    };
    Ok(SectionSubFunds { rows, totals })
}

fn build_limit(result: &Value) -> Result<SectionLimit, ReportError> {
    let adjustment = match result.get("personnel_adjustment") {
        None | Some(Value::Null) => None,
        Some(c) => Some(AdjustmentRow {
            description: json_get_str(c, "/description")?,
            amount: format_eur(json_get_f64(c, "/amount")?),
            citation: json_get_str(c, "/citation")?,
        }),
    };
    let overage = result.get("overage").and_then(Value::as_f64).filter(|v| *v > 0.0);
    Ok(SectionLimit {
        baseline_2016: format_eur(json_get_f64(result, "/baseline_2016")?),
        adjustment,
        adjusted_limit: format_eur(json_get_f64(result, "/adjusted_limit")?),
        subject_to_limit: format_eur(json_get_f64(result, "/total_subject_to_limit")?),
        overage: overage.map(format_eur),
        within_limit: overage.is_none(),
    })
}

fn build_integrity(run: &Value) -> Result<SectionIntegrity, ReportError> {
    Ok(SectionIntegrity {
        run_id: json_get_str(run, "/id")?,
        format: json_get_str(run, "/format")?,
        timestamp_utc: json_get_str(run, "/timestamp_utc")?,
        engine_vendor: json_get_str(run, "/engine/vendor")?,
        engine_name: json_get_str(run, "/engine/name")?,
        engine_version: json_get_str(run, "/engine/version")?,
        engine_build: json_get_str(run, "/engine/build")?,
        input_sha256: json_get_str(run, "/inputs/input_sha256")?,
        normative_sha256: json_get_str(run, "/inputs/normative_sha256")?,
        result_sha256: json_get_str(run, "/outputs/result_sha256")?,
        findings_sha256: json_get_str(run, "/outputs/findings_sha256")?,
    })
}

/// All three groups, possibly empty, in `SEVERITY_GROUPS` order.
fn group_findings(findings: &[Value]) -> Result<Vec<FindingGroup>, ReportError> {
    let mut groups: Vec<FindingGroup> = SEVERITY_GROUPS
        .iter()
        .map(|(sev, title)| FindingGroup { severity: sev.to_string(), title: title.to_string(), items: Vec::new() })
        .collect();
    for f in findings {
        let severity = json_get_str(f, "/severity")?;
        let group = groups
            .iter_mut()
            .find(|g| g.severity == severity)
            .ok_or(ReportError::Inconsistent("findings:unknown_severity"))?;
        group.items.push(FindingRow {
            id: json_get_str(f, "/id")?,
            description: json_get_str(f, "/description")?,
            current_value: json_get_str(f, "/current_value")?,
            limit: json_get_str(f, "/limit")?,
            message: json_get_str(f, "/message")?,
            citation: json_get_str(f, "/citation")?,
        });
    }
    Ok(groups)
}

fn check_summary(run: &Value, groups: &[FindingGroup]) -> Result<(), ReportError> {
    for g in groups {
        let recorded = match g.severity.as_str() {
            "error" => json_get_u64(run, "/summary/error")?,
            "warning" => json_get_u64(run, "/summary/warning")?,
            _ => json_get_u64(run, "/summary/info")?,
        };
        if recorded != g.items.len() as u64 {
            return Err(ReportError::Inconsistent("run_record.summary vs findings"));
        }
    }
    Ok(())
}

// ===== Renderers =====

/// Serialize the model as pretty JSON (field order follows the struct layout).
#[cfg(feature = "render_json")]
pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    serde_json::to_string_pretty(model).map_err(|_| ReportError::Template("json_serialize"))
}

/// Render a self-contained HTML page (no external assets, auto-escaped).
#[cfg(feature = "render_html")]
pub fn render_html(model: &ReportModel) -> Result<String, ReportError> {
    use minijinja::{context, Environment};

    static TEMPLATE: &str = r#"<!doctype html>
<html lang="it"><meta charset="utf-8">
<title>{{ cover.title }} {{ cover.reference_year }} - {{ cover.entity }}</title>
<style>
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; }
td, th { border: 1px solid #999; padding: 4px 8px; }
td.num { text-align: right; }
.error { color: #a00; } .warning { color: #a60; } .info { color: #036; }
</style>
<h1>{{ cover.title }} {{ cover.reference_year }}</h1>
<p><strong>{{ cover.entity }}</strong></p>
<p>Totale fondo: {{ cover.total_fund }} · Esito: {{ cover.outcome }}</p>

<h2>Fondi</h2>
<table>
  <tr><th>Fondo</th><th>Parte stabile</th><th>Parte variabile</th><th>Totale</th></tr>
  {% for r in sub_funds.rows %}
  <tr><td>{{ r.label }}</td><td class="num">{{ r.stable }}</td><td class="num">{{ r.variable }}</td><td class="num">{{ r.total }}</td></tr>
  {% endfor %}
  <tr><th>{{ sub_funds.totals.label }}</th><th class="num">{{ sub_funds.totals.stable }}</th><th class="num">{{ sub_funds.totals.variable }}</th><th class="num">{{ sub_funds.totals.total }}</th></tr>
</table>

<h2>Limite Art. 23 c.2 D.Lgs. 75/2017</h2>
<ul>
  <li>Fondo 2016: {{ limit.baseline_2016 }}</li>
  {% if limit.adjustment %}
  <li>{{ limit.adjustment.description }}: {{ limit.adjustment.amount }} ({{ limit.adjustment.citation }})</li>
  {% endif %}
  <li>Limite adeguato: {{ limit.adjusted_limit }}</li>
  <li>Risorse soggette al limite: {{ limit.subject_to_limit }}</li>
  {% if limit.overage %}
  <li class="error">Superamento: {{ limit.overage }}</li>
  {% else %}
  <li>Limite rispettato</li>
  {% endif %}
</ul>

<h2>Verifiche</h2>
{% for g in findings %}
<h3 class="{{ g.severity }}">{{ g.title }} ({{ g.items|length }})</h3>
<ul>
  {% for f in g.items %}
  <li id="{{ f.id }}"><strong>{{ f.description }}</strong>: {{ f.message }}
    <br>Valore: {{ f.current_value }} · Limite: {{ f.limit }} · {{ f.citation }}</li>
  {% endfor %}
</ul>
{% else %}
<p>Nessuna verifica.</p>
{% endfor %}

<h2>Integrità</h2>
<p>Motore: {{ integrity.engine_vendor }}/{{ integrity.engine_name }} v{{ integrity.engine_version }} ({{ integrity.engine_build }})</p>
<p>Esecuzione: {{ integrity.run_id }} · {{ integrity.format }} · {{ integrity.timestamp_utc }}</p>
<p>Input: {{ integrity.input_sha256 }}<br>Normativa: {{ integrity.normative_sha256 }}<br>
Risultato: {{ integrity.result_sha256 }}<br>Verifiche: {{ integrity.findings_sha256 }}</p>
</html>
"#;

    let mut env = Environment::new();
    env.add_template("report.html", TEMPLATE)
        .map_err(|_| ReportError::Template("add_template"))?;
    let tmpl = env
        .get_template("report.html")
        .map_err(|_| ReportError::Template("get_template"))?;

    let ctx = context! {
        cover => &model.cover,
        sub_funds => &model.sub_funds,
        limit => &model.limit,
        findings => &model.findings,
        integrity => &model.integrity,
    };
    tmpl.render(ctx).map_err(|_| ReportError::Template("render_html"))
}

// ===== Helpers =====

fn json_get_str(root: &Value, ptr: &'static str) -> Result<String, ReportError> {
    root.pointer(ptr)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ReportError::MissingField(ptr))
}

fn json_get_u64(root: &Value, ptr: &'static str) -> Result<u64, ReportError> {
    root.pointer(ptr)
        .and_then(Value::as_u64)
        .ok_or(ReportError::MissingField(ptr))
}

fn json_get_f64(root: &Value, ptr: &'static str) -> Result<f64, ReportError> {
    root.pointer(ptr)
        .and_then(Value::as_f64)
        .ok_or(ReportError::MissingField(ptr))
}

pub mod prelude {
    //! `use frd_report::prelude::*;`
    pub use crate::{build_model, ReportError, ReportModel};
    #[cfg(feature = "render_html")]
    pub use crate::render_html;
    #[cfg(feature = "render_json")]
    pub use crate::render_json;
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    fn sub(stable: f64, variable: f64) -> Value {
        json!({ "stable": stable, "variable": variable, "total": stable + variable })
    }

    fn result() -> Value {
        json!({
            "employee": sub(100000.0, 5000.0),
            "eq": sub(8000.0, 1200.5),
            "secretary": sub(0.0, 0.0),
            "executive": sub(0.0, 0.0),
            "total_stable": 108000.0,
            "total_variable": 6200.5,
            "total_fund": 114200.5,
            "baseline_2016": 95000.0,
            "personnel_adjustment": {
                "description": "Adeguamento fondo per variazione personale",
                "amount": 10000.0,
                "citation": "Art. 23, comma 2, D.Lgs. 75/2017",
                "kind": "stable"
            },
            "adjusted_limit": 105000.0,
            "total_subject_to_limit": 108000.0,
            "overage": 3000.0,
            "employee_detail": {}
        })
    }

    fn finding(id: &str, severity: &str) -> Value {
        json!({
            "id": id,
            "description": format!("verifica {id}"),
            "compliant": severity != "error",
            "current_value": "€ 1,00",
            "limit": "€ 2,00",
            "message": "messaggio",
            "citation": "Art. 1",
            "severity": severity
        })
    }

    fn findings() -> Value {
        json!([finding("limite_art23_c2", "error"), finding("verifica_incremento_consistenza", "warning")])
    }

    fn run() -> Value {
        json!({
            "id": "RUN:abc",
            "format": "frd.run_record/1",
            "timestamp_utc": "1970-01-01T00:00:00Z",
            "engine": { "vendor": "frd", "name": "frd_engine", "version": "0.1.0", "build": "dev" },
            "reference_year": 2025,
            "entity_name": "Comune di <Prova>",
            "inputs": { "input_sha256": "i", "normative_sha256": "n" },
            "outputs": { "result_sha256": "r", "findings_sha256": "f" },
            "summary": { "info": 0, "warning": 1, "error": 1 }
        })
    }

    #[test]
    fn model_formats_amounts_and_groups_findings() {
        let m = build_model(&result(), &findings(), &run()).unwrap();
        assert_eq!(m.cover.reference_year, 2025);
        assert_eq!(m.cover.total_fund, "€ 114.200,50");
        assert_eq!(m.cover.outcome, "Non conforme");
        assert_eq!(m.sub_funds.rows.len(), 4);
        assert_eq!(m.sub_funds.rows[1].variable, "€ 1.200,50");
        assert_eq!(m.limit.overage.as_deref(), Some("€ 3.000,00"));
        assert!(!m.limit.within_limit);
        assert_eq!(m.limit.adjustment.as_ref().map(|a| a.amount.as_str()), Some("€ 10.000,00"));

        // Empty groups are dropped; errors come first.
        let sev: Vec<&str> = m.findings.iter().map(|g| g.severity.as_str()).collect();
        assert_eq!(sev, vec!["error", "warning"]);
        assert_eq!(m.integrity.run_id, "RUN:abc");
    }

    #[test]
    fn within_limit_without_overage_or_adjustment() {
        let mut r = result();
        let obj = r.as_object_mut().unwrap();
        obj.remove("overage");
        obj.remove("personnel_adjustment");
        let f = json!([finding("limite_art23_c2", "info")]);
        let mut rr = run();
        rr["summary"] = json!({ "info": 1, "warning": 0, "error": 0 });

        let m = build_model(&r, &f, &rr).unwrap();
        assert!(m.limit.within_limit);
        assert!(m.limit.adjustment.is_none());
        assert_eq!(m.cover.outcome, "Conforme");
    }

    #[test]
    fn mismatched_summary_is_inconsistent() {
        let mut rr = run();
        rr["summary"]["error"] = json!(2);
        let err = build_model(&result(), &findings(), &rr).unwrap_err();
        assert!(matches!(err, ReportError::Inconsistent(_)));
    }

    #[test]
    fn missing_field_names_the_pointer() {
        let mut rr = run();
        rr.as_object_mut().unwrap().remove("engine");
        let err = build_model(&result(), &findings(), &rr).unwrap_err();
        assert_eq!(err, ReportError::MissingField("/engine/vendor"));
    }

    #[cfg(feature = "render_json")]
    #[test]
    fn json_report_keeps_section_layout() {
        let m = build_model(&result(), &findings(), &run()).unwrap();
        let out: Value = serde_json::from_str(&render_json(&m).unwrap()).unwrap();
        assert_json_include!(
            actual: out,
            expected: json!({
                "cover": { "entity": "Comune di <Prova>", "outcome": "Non conforme" },
                "limit": { "adjusted_limit": "€ 105.000,00", "within_limit": false },
                "integrity": { "format": "frd.run_record/1" }
            })
        );
    }

    #[cfg(feature = "render_html")]
    #[test]
    fn html_report_is_escaped() {
        let m = build_model(&result(), &findings(), &run()).unwrap();
        let html = render_html(&m).unwrap();
        assert!(html.contains("Comune di &lt;Prova&gt;"));
        assert!(!html.contains("<Prova>"));
        assert!(html.contains("Superamento: € 3.000,00"));
        assert!(html.contains("id=\"limite_art23_c2\""));
    }
}
