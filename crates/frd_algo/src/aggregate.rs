//! Fund aggregation: four sub-funds, overall totals, the Art. 23 c.2 limit check.
//!
//! Order of evaluation:
//! 1. EQ fund (its increment-with-reduction feeds the employee fund)
//! 2. employee fund (descriptor fold), secretary, executive
//! 3. overall totals
//! 4. 2016 baseline, personnel-variation adjustment, adjusted limit, overage
//!
//! Absent amounts read as zero. A non-finite stored amount fails the whole call.

use serde::Serialize;

use frd_core::errors::CoreError;
use frd_core::input::InputData;
use frd_core::normative::{CitationKey, NormativeConstants};

use crate::compliance::cite;
use crate::effective::EffectiveContext;
use crate::fte;
use crate::subfunds::{
    employee_fund, eq_fund, executive_fund, increment_with_reduction, secretary_fund,
    EmployeeBreakdown, SubFundTotals,
};

pub const PERSONNEL_ADJUSTMENT_DESCRIPTION: &str =
    "Adeguamento fondo per variazione personale (Art. 23 c.2 D.Lgs. 75/2017, base 2018)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Stable,
    Variable,
}

/// A named fund component with its legal basis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundComponent {
    pub description: String,
    pub amount: f64,
    pub citation: String,
    pub kind: ComponentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub employee: SubFundTotals,
    pub eq: SubFundTotals,
    pub secretary: SubFundTotals,
    pub executive: SubFundTotals,

    pub total_stable: f64,
    pub total_variable: f64,
    pub total_fund: f64,

    pub baseline_2016: f64,
    /// Present only when strictly positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personnel_adjustment: Option<FundComponent>,
    pub adjusted_limit: f64,
    pub total_subject_to_limit: f64,
    /// Present only when strictly positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overage: Option<f64>,

    pub employee_detail: EmployeeBreakdown,
}

impl AggregateResult {
    pub fn adjustment_amount(&self) -> f64 {
        self.personnel_adjustment.as_ref().map_or(0.0, |c| c.amount)
    }

    pub fn sub_funds(&self) -> [(&'static str, SubFundTotals); 4] {
        [
            ("employee", self.employee),
            ("eq", self.eq),
            ("secretary", self.secretary),
            ("executive", self.executive),
        ]
    }
}

pub fn aggregate(
    input: &InputData,
    constants: &NormativeConstants,
) -> Result<AggregateResult, CoreError> {
    input.ensure_finite()?;
    let annual = &input.annual;

    // ---------- Sub-funds ----------
    let eq = eq_fund(&input.eq_fund);
    let ctx = EffectiveContext::from_input(input, increment_with_reduction(&input.eq_fund));
    let (employee, employee_detail) = employee_fund(&input.employee_fund, &ctx);
    let secretary = secretary_fund(&input.secretary_fund);
    let executive = executive_fund(&input.executive_fund, annual.has_executives());

    let outcomes = [employee, eq, secretary, executive];
    let total_stable: f64 = outcomes.iter().map(|o| o.totals.stable).sum();
    let total_variable: f64 = outcomes.iter().map(|o| o.totals.variable).sum();

    tracing::debug!(
        employee = employee.totals.total,
        eq = eq.totals.total,
        secretary = secretary.totals.total,
        executive = executive.totals.total,
        "sub-fund totals"
    );

    // ---------- Limit ----------
    let baseline_2016 = input.historical.baseline_2016();
    let adjustment = fte::adjustment_from_lists(
        input.historical.baseline_2018(),
        &annual.personnel_2018,
        &annual.personnel_current,
    );
    let personnel_adjustment = adjustment.map(|amount| FundComponent {
        description: PERSONNEL_ADJUSTMENT_DESCRIPTION.to_string(),
        amount,
        citation: cite(constants, CitationKey::Art23Dlgs75).to_string(),
        kind: ComponentKind::Stable,
    });
    let adjusted_limit = baseline_2016 + adjustment.unwrap_or(0.0);
    let total_subject_to_limit: f64 = outcomes.iter().map(|o| o.subject_to_cap).sum();
    let excess = total_subject_to_limit - adjusted_limit;
    let overage = (excess > 0.0).then_some(excess);

    tracing::debug!(
        baseline_2016,
        adjustment = adjustment.unwrap_or(0.0),
        total_subject_to_limit,
        ?overage,
        "2016 limit"
    );

    Ok(AggregateResult {
        employee: employee.totals,
        eq: eq.totals,
        secretary: secretary.totals,
        executive: executive.totals,
        total_stable,
        total_variable,
        total_fund: total_stable + total_variable,
        baseline_2016,
        personnel_adjustment,
        adjusted_limit,
        total_subject_to_limit,
        overage,
        employee_detail,
    })
}
