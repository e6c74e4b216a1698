//! Art. 79 c.1c CCNL 2022: entered staffing increment vs the recomputed one.
//!
//! The recomputation uses the employee 2018 fund alone as the per-capita base.

use frd_core::input::InputData;
use frd_core::keys::EmployeeItem;
use frd_core::money::{format_eur, format_eur_opt, or_zero, round2, CENT_TOLERANCE};
use frd_core::normative::{CitationKey, NormativeConstants};

use super::{cite, Finding, RelatedSection, Severity};
use crate::fte;

const ID: &str = "verifica_incremento_consistenza";
const DESCRIPTION: &str = "Verifica dell'incremento per aumento della consistenza organica";

/// Increment due for the growth in staff since 2018, rounded to cents.
pub fn expected_increment(input: &InputData) -> f64 {
    let adj = fte::adjustment_from_lists(
        or_zero(input.historical.employee_fund_2018),
        &input.annual.personnel_2018,
        &input.annual.personnel_current,
    );
    round2(adj.unwrap_or(0.0))
}

pub(super) fn check(input: &InputData, constants: &NormativeConstants, out: &mut Vec<Finding>) {
    let expected = expected_increment(input);
    if expected <= 0.0 {
        return;
    }
    let entered = input.employee_fund.get(EmployeeItem::IncrementoConsistenzaPersonale);
    let shortfall = expected - entered.unwrap_or(0.0);
    let limit = format!("Calcolato: {}", format_eur(expected));

    let finding = if entered.is_none() || shortfall > CENT_TOLERANCE {
        Finding::new(ID, DESCRIPTION, Severity::Warning, false)
            .message(format!(
                "L'importo inserito è inferiore di {} rispetto a quanto calcolato. Si potrebbe non utilizzare a pieno le risorse disponibili per l'incremento.",
                format_eur(shortfall)
            ))
            .related(RelatedSection::EmployeeFund)
    } else {
        Finding::new(ID, DESCRIPTION, Severity::Info, true)
            .message("L'importo inserito è conforme a quanto calcolato per l'incremento.")
    };
    out.push(
        finding
            .values(format_eur_opt(entered), limit)
            .citation(cite(constants, CitationKey::Art79c1cCcnl2022)),
    );
}
