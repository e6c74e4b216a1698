//! normative.rs — Normative constants (citations, thresholds, per-capita values).
//!
//! Loaded once per session from a static document and treated as immutable
//! configuration. Citations are addressed through [`CitationKey`]; each key has
//! a built-in text used when the document lacks the entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerCapitaValues {
    pub art67_ccnl_2018: f64,
    pub art79_ccnl_2022_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(rename = "incidenza_salario_accessorio")]
    pub accessory_pay_incidence: f64,
    #[serde(rename = "incremento_virtuosi_dl25_2025")]
    pub virtuous_increment_dl25_2025: f64,
    #[serde(rename = "incremento_pnrr_dl13_2023")]
    pub pnrr_increment_dl13_2023: f64,
    /// Minimum share (%) of bargaining resources for individual performance.
    #[serde(rename = "quota_minima_performance_individuale", default = "default_min_individual_performance_pct")]
    pub min_individual_performance_pct: f64,
    /// Minimum share (%) of the EQ fund for result-based pay.
    #[serde(rename = "quota_minima_risultato_eq", default = "default_min_eq_result_pct")]
    pub min_eq_result_pct: f64,
}

fn default_min_individual_performance_pct() -> f64 {
    30.0
}

fn default_min_eq_result_pct() -> f64 {
    15.0
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            accessory_pay_incidence: 0.0,
            virtuous_increment_dl25_2025: 0.0,
            pnrr_increment_dl13_2023: 0.0,
            min_individual_performance_pct: default_min_individual_performance_pct(),
            min_eq_result_pct: default_min_eq_result_pct(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormativeConstants {
    #[serde(rename = "valori_pro_capite")]
    pub per_capita: PerCapitaValues,
    #[serde(rename = "limiti")]
    pub limits: Limits,
    #[serde(rename = "riferimenti_normativi")]
    pub references: BTreeMap<String, String>,
    /// Economic progression values by area, then by level.
    #[serde(default, rename = "progression_economic_values")]
    pub progression_values: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default, rename = "indennita_comparto_values")]
    pub comparto_allowance_values: BTreeMap<String, f64>,
}

impl NormativeConstants {
    /// Citation text from the document, if present.
    pub fn reference(&self, key: CitationKey) -> Option<&str> {
        self.references.get(key.as_str()).map(String::as_str)
    }

    /// Citation text, falling back to the key's built-in text.
    pub fn citation(&self, key: CitationKey) -> &str {
        self.reference(key).unwrap_or(key.fallback())
    }

    pub fn with_reference(mut self, key: CitationKey, text: impl Into<String>) -> Self {
        self.references.insert(key.as_str().to_string(), text.into());
        self
    }
}

/// Keys of `riferimenti_normativi` the checks cite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CitationKey {
    Art23Dlgs75,
    Art17Ccnl2022,
    Art14Dl25,
    Art79c1cCcnl2022,
    Art80Ccnl2022,
    Art80PenultimateCcnl2022,
    SoundFinancialManagement,
    Art54Ccnl1999,
    Art67c3gCcnl2018,
    L145Art1c1091,
    Art45Dlgs36,
}

impl CitationKey {
    pub const ALL: [CitationKey; 11] = [
        CitationKey::Art23Dlgs75,
        CitationKey::Art17Ccnl2022,
        CitationKey::Art14Dl25,
        CitationKey::Art79c1cCcnl2022,
        CitationKey::Art80Ccnl2022,
        CitationKey::Art80PenultimateCcnl2022,
        CitationKey::SoundFinancialManagement,
        CitationKey::Art54Ccnl1999,
        CitationKey::Art67c3gCcnl2018,
        CitationKey::L145Art1c1091,
        CitationKey::Art45Dlgs36,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            CitationKey::Art23Dlgs75 => "art23_dlgs75_2017",
            CitationKey::Art17Ccnl2022 => "art17_ccnl2022",
            CitationKey::Art14Dl25 => "art14_dl25_2025",
            CitationKey::Art79c1cCcnl2022 => "art79c1c_ccnl2022",
            CitationKey::Art80Ccnl2022 => "art80_ccnl2022",
            CitationKey::Art80PenultimateCcnl2022 => "art80_penultimo_ccnl2022",
            CitationKey::SoundFinancialManagement => "principi_gestione_finanziaria",
            CitationKey::Art54Ccnl1999 => "art54_ccnl1999",
            CitationKey::Art67c3gCcnl2018 => "art67c3g_ccnl2018",
            CitationKey::L145Art1c1091 => "l145_2018_art1c1091",
            CitationKey::Art45Dlgs36 => "art45_dlgs36_2023",
        }
    }

    pub const fn fallback(self) -> &'static str {
        match self {
            CitationKey::Art23Dlgs75 => "Art. 23, c. 2, D.Lgs. 75/2017",
            CitationKey::Art17Ccnl2022 => "Art. 17 CCNL 16.11.2022",
            CitationKey::Art14Dl25 => "Art. 14 D.L. 25/2025",
            CitationKey::Art79c1cCcnl2022 => "Art. 79 c.1c CCNL 16.11.2022",
            CitationKey::Art80Ccnl2022 => "Art. 80 CCNL 16.11.2022",
            CitationKey::Art80PenultimateCcnl2022 => "Art. 80, c. penultimo, CCNL 16.11.2022",
            CitationKey::SoundFinancialManagement => "Principi di corretta gestione finanziaria",
            CitationKey::Art54Ccnl1999 => "Art. 54 CCNL 01.04.1999",
            CitationKey::Art67c3gCcnl2018 => "Art. 67 c.3g CCNL 2018",
            CitationKey::L145Art1c1091 => "L. 145/2018 Art.1 c.1091",
            CitationKey::Art45Dlgs36 => "Art. 45 D.Lgs 36/2023",
        }
    }
}
