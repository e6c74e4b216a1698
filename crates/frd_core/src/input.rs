//! input.rs — InputData and its sub-records.
//!
//! Shapes mirror the fund tool's data export so a saved snapshot loads as-is.
//! Scalar fields are optional (absent = not entered); unknown scalar fields in
//! the historical/annual records are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::keys::{AllocationItem, EmployeeItem, EqItem, ExecutiveItem, LineItems, SecretaryItem};
use crate::money::or_zero;

/// Define a serde'd enum with explicit wire tokens.
macro_rules! serde_enum {
    ($(#[$meta:meta])* $name:ident => { $($variant:ident = $token:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }
    };
}

serde_enum!(
    /// Entity category ("tipologia ente").
    EntityType => {
        Comune = "Comune",
        Provincia = "Provincia",
        UnioneDeiComuni = "Unione dei Comuni",
        ComunitaMontana = "Comunità Montana",
        Altro = "Altro",
    }
);

serde_enum!(
    EmployeeCategory => {
        Dipendente = "Personale Dipendente non Dirigente",
        Dirigente = "Personale Dirigente",
        ElevataQualificazione = "Titolari di Incarichi di Elevata Qualificazione (EQ)",
        Segretario = "Segretario Generale",
    }
);

impl EntityType {
    /// Municipalities and provinces carry the 2018 personnel-fund baseline.
    pub fn needs_2018_baseline(self) -> bool {
        matches!(self, EntityType::Comune | EntityType::Provincia)
    }
}

// ---------- Historical ----------

/// Certified baselines: 2016 per sub-fund, 2018 for the personnel-variation adjustment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalData {
    #[serde(rename = "fondoSalarioAccessorioPersonaleNonDirEQ2016")]
    pub employee_fund_2016: Option<f64>,
    #[serde(rename = "fondoElevateQualificazioni2016")]
    pub eq_fund_2016: Option<f64>,
    #[serde(rename = "fondoDirigenza2016")]
    pub executive_fund_2016: Option<f64>,
    #[serde(rename = "risorseSegretarioComunale2016")]
    pub secretary_fund_2016: Option<f64>,
    #[serde(rename = "personaleServizio2018")]
    pub personnel_2018: Option<f64>,
    #[serde(rename = "spesaStipendiTabellari2023")]
    pub tabular_salaries_2023: Option<f64>,
    #[serde(rename = "includeDifferenzialiStipendiali2023")]
    pub include_salary_differentials_2023: Option<bool>,
    #[serde(rename = "fondoPersonaleNonDirEQ2018_Art23")]
    pub employee_fund_2018: Option<f64>,
    #[serde(rename = "fondoEQ2018_Art23")]
    pub eq_fund_2018: Option<f64>,
    #[serde(rename = "totaleFondoAnnoPrecedente")]
    pub previous_year_total: Option<f64>,
}

impl HistoricalData {
    /// Sum of the four certified 2016 sub-fund amounts.
    pub fn baseline_2016(&self) -> f64 {
        or_zero(self.employee_fund_2016)
            + or_zero(self.eq_fund_2016)
            + or_zero(self.executive_fund_2016)
            + or_zero(self.secretary_fund_2016)
    }

    /// 2018 amount used as per-capita base for the personnel-variation adjustment.
    pub fn baseline_2018(&self) -> f64 {
        or_zero(self.employee_fund_2018) + or_zero(self.eq_fund_2018)
    }

    fn amounts(&self) -> [(&'static str, Option<f64>); 9] {
        [
            ("fondoSalarioAccessorioPersonaleNonDirEQ2016", self.employee_fund_2016),
            ("fondoElevateQualificazioni2016", self.eq_fund_2016),
            ("fondoDirigenza2016", self.executive_fund_2016),
            ("risorseSegretarioComunale2016", self.secretary_fund_2016),
            ("personaleServizio2018", self.personnel_2018),
            ("spesaStipendiTabellari2023", self.tabular_salaries_2023),
            ("fondoPersonaleNonDirEQ2018_Art23", self.employee_fund_2018),
            ("fondoEQ2018_Art23", self.eq_fund_2018),
            ("totaleFondoAnnoPrecedente", self.previous_year_total),
        ]
    }
}

// ---------- Annual ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadcountByCategory {
    pub category: EmployeeCategory,
    #[serde(default)]
    pub count: Option<f64>,
}

/// One employee in the Art. 23 personnel lists (2018 or current year).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Art23Employee {
    pub id: String,
    #[serde(default, rename = "matricola", skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, rename = "partTimePercentage")]
    pub part_time_pct: Option<f64>,
    /// Payslips issued in the year ("cedolini emessi"), 0..=12.
    #[serde(default, rename = "cedoliniEmessi")]
    pub payslips: Option<f64>,
}

impl Art23Employee {
    pub fn full_time(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    pub fn part_time(id: impl Into<String>, pct: f64) -> Self {
        Self { id: id.into(), part_time_pct: Some(pct), ..Self::default() }
    }

    pub fn with_payslips(mut self, n: f64) -> Self {
        self.payslips = Some(n);
        self
    }
}

/// Results of the upstream increment simulator (read-only here).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorResults {
    #[serde(rename = "fase1_obiettivo48")]
    pub target_48: Option<f64>,
    #[serde(rename = "fase1_fondoAttualeComplessivo")]
    pub current_fund_total: Option<f64>,
    #[serde(rename = "fase1_incrementoPotenzialeLordo")]
    pub gross_potential_increment: Option<f64>,
    #[serde(rename = "fase2_spesaPersonaleAttualePrevista")]
    pub expected_personnel_spending: Option<f64>,
    #[serde(rename = "fase2_sogliaPercentualeDM17_03_2020")]
    pub dm_2020_threshold_pct: Option<f64>,
    #[serde(rename = "fase2_limiteSostenibileDL34")]
    pub sustainable_limit_dl34: Option<f64>,
    #[serde(rename = "fase2_spazioDisponibileDL34")]
    pub available_room_dl34: Option<f64>,
    #[serde(rename = "fase3_margineDisponibileL296_06")]
    pub margin_l296: Option<f64>,
    #[serde(rename = "fase4_spazioUtilizzabileLordo")]
    pub usable_gross_room: Option<f64>,
    /// Ceiling for the PA-decree increment line.
    #[serde(rename = "fase5_incrementoNettoEffettivoFondo")]
    pub net_fund_increment: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualData {
    #[serde(rename = "annoRiferimento")]
    pub reference_year: u16,
    #[serde(default, rename = "denominazioneEnte")]
    pub entity_name: Option<String>,
    #[serde(default, rename = "tipologiaEnte")]
    pub entity_type: Option<EntityType>,
    #[serde(default, rename = "altroTipologiaEnte", skip_serializing_if = "Option::is_none")]
    pub other_entity_type: Option<String>,
    #[serde(default, rename = "numeroAbitanti")]
    pub inhabitants: Option<f64>,
    #[serde(default, rename = "isEnteDissestato")]
    pub in_bankruptcy: Option<bool>,
    #[serde(default, rename = "isEnteStrutturalmenteDeficitario")]
    pub structurally_deficient: Option<bool>,
    #[serde(default, rename = "isEnteRiequilibrioFinanziario")]
    pub in_rebalancing_plan: Option<bool>,
    #[serde(default, rename = "hasDirigenza")]
    pub has_executives: Option<bool>,
    #[serde(default, rename = "isDistributionMode")]
    pub distribution_mode: Option<bool>,
    #[serde(default, rename = "personaleServizioAttuale")]
    pub headcounts: Vec<HeadcountByCategory>,
    #[serde(default, rename = "personale2018PerArt23")]
    pub personnel_2018: Vec<Art23Employee>,
    #[serde(default, rename = "personaleAnnoRifPerArt23")]
    pub personnel_current: Vec<Art23Employee>,
    #[serde(default, rename = "simulatoreRisultati", skip_serializing_if = "Option::is_none")]
    pub simulator: Option<SimulatorResults>,
}

impl AnnualData {
    /// Any of the three financial-distress flags is set.
    pub fn in_distress(&self) -> bool {
        self.in_bankruptcy.unwrap_or(false)
            || self.structurally_deficient.unwrap_or(false)
            || self.in_rebalancing_plan.unwrap_or(false)
    }

    pub fn has_executives(&self) -> bool {
        self.has_executives.unwrap_or(false)
    }

    pub fn distribution_mode(&self) -> bool {
        self.distribution_mode.unwrap_or(false)
    }

    /// Ceiling reported by the simulator for the PA-decree increment, if any.
    pub fn simulator_ceiling(&self) -> Option<f64> {
        self.simulator.as_ref().and_then(|s| s.net_fund_increment)
    }

    /// Headcount for one category (absent = 0).
    pub fn headcount(&self, category: EmployeeCategory) -> f64 {
        self.headcounts
            .iter()
            .filter(|h| h.category == category)
            .map(|h| or_zero(h.count))
            .sum()
    }
}

// ---------- Distribution ----------

/// One allocation row: allocated amount, savings, on-budget amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationDetail {
    #[serde(rename = "stanziate")]
    pub allocated: Option<f64>,
    #[serde(rename = "risparmi")]
    pub savings: Option<f64>,
    #[serde(rename = "aBilancio")]
    pub on_budget: Option<f64>,
    /// Set once a user edits a derived allocation; derived defaults then leave it alone.
    #[serde(rename = "isManuallyOverridden", skip_serializing_if = "is_false")]
    pub manually_overridden: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl AllocationDetail {
    pub fn allocated(amount: f64) -> Self {
        Self { allocated: Some(amount), ..Self::default() }
    }

    pub fn overridden(amount: f64) -> Self {
        Self { allocated: Some(amount), manually_overridden: true, ..Self::default() }
    }

    #[inline]
    pub fn allocated_or_zero(&self) -> f64 {
        or_zero(self.allocated)
    }
}

/// Resource distribution record: fixed stable-part uses, `p_*` allocations, criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionData {
    #[serde(default, rename = "u_diffProgressioniStoriche")]
    pub historical_progressions: Option<f64>,
    #[serde(default, rename = "u_indennitaComparto")]
    pub comparto_allowance: Option<f64>,
    #[serde(default, rename = "u_incrIndennitaEducatori", skip_serializing_if = "Option::is_none")]
    pub educators_allowance: Option<AllocationDetail>,
    #[serde(default, rename = "u_incrIndennitaScolastico", skip_serializing_if = "Option::is_none")]
    pub school_staff_allowance: Option<AllocationDetail>,
    #[serde(default, rename = "u_indennitaEx8QF", skip_serializing_if = "Option::is_none")]
    pub former_8qf_allowance: Option<AllocationDetail>,

    #[serde(default, rename = "criteri_isConsuntivoMode")]
    pub final_accounts_mode: Option<bool>,
    #[serde(default, rename = "criteri_percPerfIndividuale")]
    pub individual_performance_pct: Option<f64>,
    #[serde(default, rename = "criteri_percMaggiorazionePremio")]
    pub bonus_uplift_pct: Option<f64>,
    #[serde(default, rename = "criteri_percDipendentiBonus")]
    pub bonus_recipients_pct: Option<f64>,

    #[serde(flatten)]
    pub allocations: BTreeMap<AllocationItem, AllocationDetail>,
}

impl DistributionData {
    /// Fixed stable-part uses (progressions, allowances).
    pub fn stable_uses(&self) -> f64 {
        or_zero(self.historical_progressions)
            + or_zero(self.comparto_allowance)
            + [&self.educators_allowance, &self.school_staff_allowance, &self.former_8qf_allowance]
                .into_iter()
                .flatten()
                .map(AllocationDetail::allocated_or_zero)
                .sum::<f64>()
    }

    /// Allocated amount of one `p_*` row (absent = 0).
    pub fn allocated(&self, item: AllocationItem) -> f64 {
        self.allocations.get(&item).map_or(0.0, AllocationDetail::allocated_or_zero)
    }

    /// Sum of allocated amounts over all `p_*` rows.
    pub fn variable_uses(&self) -> f64 {
        self.allocations.values().map(AllocationDetail::allocated_or_zero).sum()
    }

    pub fn with_allocation(mut self, item: AllocationItem, detail: AllocationDetail) -> Self {
        self.allocations.insert(item, detail);
        self
    }
}

// ---------- InputData ----------

/// Everything one calculation reads, besides the normative constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    #[serde(rename = "historicalData")]
    pub historical: HistoricalData,
    #[serde(rename = "annualData")]
    pub annual: AnnualData,
    #[serde(default, rename = "fondoAccessorioDipendenteData")]
    pub employee_fund: LineItems<EmployeeItem>,
    #[serde(default, rename = "fondoElevateQualificazioniData")]
    pub eq_fund: LineItems<EqItem>,
    #[serde(default, rename = "fondoSegretarioComunaleData")]
    pub secretary_fund: LineItems<SecretaryItem>,
    #[serde(default, rename = "fondoDirigenzaData")]
    pub executive_fund: LineItems<ExecutiveItem>,
    #[serde(default, rename = "distribuzioneRisorseData")]
    pub distribution: DistributionData,
}

impl InputData {
    /// Fails on the first NaN/infinite amount anywhere in the record.
    pub fn ensure_finite(&self) -> Result<(), CoreError> {
        for (name, v) in self.historical.amounts() {
            check_finite(name, v)?;
        }
        for e in self.annual.personnel_2018.iter().chain(&self.annual.personnel_current) {
            check_finite("partTimePercentage", e.part_time_pct)?;
            check_finite("cedoliniEmessi", e.payslips)?;
        }
        if let Some(sim) = &self.annual.simulator {
            check_finite("fase5_incrementoNettoEffettivoFondo", sim.net_fund_increment)?;
        }
        self.employee_fund.ensure_finite()?;
        self.eq_fund.ensure_finite()?;
        self.secretary_fund.ensure_finite()?;
        self.executive_fund.ensure_finite()?;

        let d = &self.distribution;
        check_finite("u_diffProgressioniStoriche", d.historical_progressions)?;
        check_finite("u_indennitaComparto", d.comparto_allowance)?;
        for (item, detail) in &d.allocations {
            check_finite(item.as_str(), detail.allocated)?;
        }
        Ok(())
    }
}

fn check_finite(name: &'static str, v: Option<f64>) -> Result<(), CoreError> {
    match v {
        Some(x) if !x.is_finite() => Err(CoreError::NonFiniteAmount(name)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_export_shaped_json() {
        let json = r#"{
            "historicalData": {
                "fondoSalarioAccessorioPersonaleNonDirEQ2016": 150000,
                "fondoEQ2018_Art23": null,
                "campoSconosciuto": 3
            },
            "annualData": {
                "annoRiferimento": 2025,
                "denominazioneEnte": "Comune di Prova",
                "tipologiaEnte": "Comunità Montana",
                "isEnteDissestato": true,
                "personaleServizioAttuale": [
                    { "category": "Personale Dipendente non Dirigente", "count": 12 }
                ],
                "personale2018PerArt23": [ { "id": "a", "partTimePercentage": 50 } ],
                "personaleAnnoRifPerArt23": [],
                "simulatoreRisultati": { "fase5_incrementoNettoEffettivoFondo": 4000 }
            },
            "fondoAccessorioDipendenteData": { "st_art79c1b_euro8450": 8450 },
            "distribuzioneRisorseData": {
                "u_diffProgressioniStoriche": 1000,
                "u_incrIndennitaEducatori": { "stanziate": 250 },
                "p_performanceIndividuale": { "stanziate": 3000, "isManuallyOverridden": true },
                "criteri_percPerfIndividuale": 60
            }
        }"#;
        let input: InputData = serde_json::from_str(json).unwrap();
        assert_eq!(input.historical.baseline_2016(), 150_000.0);
        assert_eq!(input.annual.entity_type, Some(EntityType::ComunitaMontana));
        assert!(input.annual.in_distress());
        assert_eq!(input.annual.headcount(EmployeeCategory::Dipendente), 12.0);
        assert_eq!(input.annual.simulator_ceiling(), Some(4000.0));
        assert_eq!(input.employee_fund.value(EmployeeItem::Euro8450), 8450.0);
        assert_eq!(input.eq_fund.len(), 0);
        assert_eq!(input.distribution.stable_uses(), 1250.0);
        assert_eq!(input.distribution.allocated(AllocationItem::PerformanceIndividuale), 3000.0);
        assert!(input.distribution.allocations[&AllocationItem::PerformanceIndividuale].manually_overridden);
        assert_eq!(input.distribution.individual_performance_pct, Some(60.0));
    }

    #[test]
    fn missing_annual_record_is_rejected() {
        let res: Result<InputData, _> = serde_json::from_str(r#"{ "historicalData": {} }"#);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_allocation_key_is_rejected() {
        let json = r#"{
            "historicalData": {},
            "annualData": { "annoRiferimento": 2025 },
            "distribuzioneRisorseData": { "p_nonEsiste": { "stanziate": 1 } }
        }"#;
        assert!(serde_json::from_str::<InputData>(json).is_err());
    }

    #[test]
    fn distress_flags_default_to_false() {
        let annual = AnnualData::default();
        assert!(!annual.in_distress());
        assert!(!annual.has_executives());
        assert!(!annual.distribution_mode());
    }

    #[test]
    fn non_finite_historical_amount_is_reported() {
        let mut input = InputData::default();
        input.historical.eq_fund_2016 = Some(f64::NAN);
        assert_eq!(
            input.ensure_finite(),
            Err(CoreError::NonFiniteAmount("fondoElevateQualificazioni2016"))
        );
    }
}
