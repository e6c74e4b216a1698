//! Employee fund: a fold over the descriptor table.

use serde::Serialize;

use frd_core::keys::{EmployeeItem, LineItems};

use super::{SubFundOutcome, SubFundTotals};
use crate::descriptors::{employee_descriptors, Section};
use crate::effective::{effective_value, EffectiveContext};

/// Signed per-section sums of the employee fund (informational).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EmployeeBreakdown {
    pub stable: f64,
    pub variable_subject: f64,
    pub variable_not_subject: f64,
    /// Signed: zero or negative.
    pub final_deductions: f64,
    /// Signed: zero or negative.
    pub cap_decurtation: f64,
    /// Stable items flagged relevant to the 2016 cap.
    pub stable_relevant_to_cap: f64,
    /// Pre-decurtation subtotal as entered (`cl_totaleParziale...`).
    pub cap_reference: f64,
    pub available_for_bargaining: f64,
}

impl EmployeeBreakdown {
    #[inline]
    pub fn variable(&self) -> f64 {
        self.variable_subject + self.variable_not_subject + self.final_deductions + self.cap_decurtation
    }
}

pub fn employee_fund(
    items: &LineItems<EmployeeItem>,
    ctx: &EffectiveContext,
) -> (SubFundOutcome, EmployeeBreakdown) {
    let mut b = EmployeeBreakdown::default();

    for d in employee_descriptors() {
        let v = d.signed(effective_value(d.key, items, ctx));
        match d.section {
            Section::Stable => {
                b.stable += v;
                if d.relevant_to_cap {
                    b.stable_relevant_to_cap += v;
                }
            }
            Section::VariableSubject => b.variable_subject += v,
            Section::VariableNotSubject => b.variable_not_subject += v,
            Section::FinalDeduction => b.final_deductions += v,
            Section::CapVerification => b.cap_decurtation += v,
            Section::CapReference => b.cap_reference += v,
        }
    }

    let totals = SubFundTotals::new(b.stable, b.variable());
    b.available_for_bargaining = totals.total;

    let outcome = SubFundOutcome { totals, subject_to_cap: b.cap_reference };
    (outcome, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_fold_with_signs() {
        let items = LineItems::new()
            .with(EmployeeItem::UnicoImporto2017, 100_000.0)
            .with(EmployeeItem::Euro8450, 8_450.0)
            .with(EmployeeItem::TaglioFondoDl78, 2_000.0)
            .with(EmployeeItem::RecuperoEvasione, 5_000.0)
            .with(EmployeeItem::SponsorConvenzioni, 1_000.0)
            .with(EmployeeItem::DecurtazioneTetto2016, 300.0)
            .with(EmployeeItem::MisureMancatoRispettoVincoli, 200.0)
            .with(EmployeeItem::TotaleParzialeConfrontoTetto2016, 103_000.0);
        let (out, b) = employee_fund(&items, &EffectiveContext::default());

        assert_eq!(out.totals.stable, 106_450.0);
        assert_eq!(out.totals.variable, 5_000.0 + 1_000.0 - 300.0 - 200.0);
        assert_eq!(out.totals.total, out.totals.stable + out.totals.variable);
        assert_eq!(b.stable_relevant_to_cap, 98_000.0);
        assert_eq!(b.cap_decurtation, -300.0);
        assert_eq!(b.final_deductions, -200.0);
        assert_eq!(b.available_for_bargaining, out.totals.total);
    }

    #[test]
    fn cap_reference_counts_toward_cap_but_not_totals() {
        let items = LineItems::new().with(EmployeeItem::TotaleParzialeConfrontoTetto2016, 50_000.0);
        let (out, _) = employee_fund(&items, &EffectiveContext::default());
        assert_eq!(out.totals, SubFundTotals::ZERO);
        assert_eq!(out.subject_to_cap, 50_000.0);
    }

    #[test]
    fn eq_reduction_is_subtracted_from_stable() {
        let items = LineItems::new().with(EmployeeItem::UnicoImporto2017, 10_000.0);
        let ctx = EffectiveContext { eq_increment_with_reduction: 1_000.0, ..Default::default() };
        let (out, _) = employee_fund(&items, &ctx);
        assert_eq!(out.totals.stable, 9_000.0);
    }
}
