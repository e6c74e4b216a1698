//! Compliance checks over an aggregated fund.
//!
//! Fixed order, all applicable checks always run:
//! 1. Art. 23 c.2 limit (always one finding)
//! 2. personnel-variation increment consistency (when the recomputed increment is > 0)
//! 3. employee distribution budget and individual-performance share (distribution mode)
//! 4. EQ distribution budget and result-pay share (distribution mode)
//! 5. earmarked source vs use pairs (distribution mode)
//! 6. simulator ceiling vs PA-decree increment (when the ceiling is > 0)
//!
//! Checks read only their arguments and append to a shared list; none fails.

use serde::Serialize;

use frd_core::input::InputData;
use frd_core::normative::{CitationKey, NormativeConstants};

use crate::aggregate::AggregateResult;

mod distribution;
mod earmarked;
mod increment;
mod limit;
mod simulator;

pub use earmarked::{EarmarkedPair, EARMARKED_PAIRS};

// ---------- Finding ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Input page a finding points the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelatedSection {
    #[serde(rename = "fundDetails")]
    FundDetails,
    #[serde(rename = "fondoAccessorioDipendente")]
    EmployeeFund,
    #[serde(rename = "distribuzioneRisorse")]
    Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub id: String,
    pub description: String,
    pub compliant: bool,
    /// Compared value, formatted.
    pub current_value: String,
    /// Limit or threshold, formatted.
    pub limit: String,
    pub message: String,
    pub citation: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_section: Option<RelatedSection>,
}

impl Finding {
    pub(crate) fn new(id: impl Into<String>, description: impl Into<String>, severity: Severity, compliant: bool) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            compliant,
            current_value: String::new(),
            limit: String::new(),
            message: String::new(),
            citation: String::new(),
            severity,
            related_section: None,
        }
    }

    pub(crate) fn values(mut self, current: impl Into<String>, limit: impl Into<String>) -> Self {
        self.current_value = current.into();
        self.limit = limit.into();
        self
    }

    pub(crate) fn message(mut self, m: impl Into<String>) -> Self {
        self.message = m.into();
        self
    }

    pub(crate) fn citation(mut self, c: impl Into<String>) -> Self {
        self.citation = c.into();
        self
    }

    pub(crate) fn related(mut self, s: RelatedSection) -> Self {
        self.related_section = Some(s);
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Citation text for `key`; warns when the constants document lacks it.
pub(crate) fn cite(constants: &NormativeConstants, key: CitationKey) -> &str {
    match constants.reference(key) {
        Some(text) => text,
        None => {
            tracing::warn!(key = key.as_str(), "citation missing from normative constants, using built-in text");
            key.fallback()
        }
    }
}

// ---------- Entry point ----------

pub fn check_compliance(
    result: &AggregateResult,
    input: &InputData,
    constants: &NormativeConstants,
) -> Vec<Finding> {
    let mut out = Vec::new();

    limit::check(result, constants, &mut out);
    increment::check(input, constants, &mut out);
    if input.annual.distribution_mode() {
        distribution::check_employee(result, input, constants, &mut out);
        distribution::check_eq(result, input, constants, &mut out);
        earmarked::check(input, constants, &mut out);
    }
    simulator::check(input, constants, &mut out);

    tracing::debug!(
        findings = out.len(),
        errors = out.iter().filter(|f| f.is_error()).count(),
        "compliance checks done"
    );
    out
}
