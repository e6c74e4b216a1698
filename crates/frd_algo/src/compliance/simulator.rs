//! Simulator ceiling vs the PA-decree increment entered in the employee fund.

use frd_core::input::InputData;
use frd_core::keys::EmployeeItem;
use frd_core::money::format_eur;
use frd_core::normative::{CitationKey, NormativeConstants};

use super::{cite, Finding, RelatedSection, Severity};

pub(super) fn check(input: &InputData, constants: &NormativeConstants, out: &mut Vec<Finding>) {
    let Some(ceiling) = input.annual.simulator_ceiling().filter(|c| *c > 0.0) else {
        return;
    };
    let entered = input.employee_fund.value(EmployeeItem::IncrementoDecretoPa);
    if entered > ceiling {
        out.push(
            Finding::new(
                "coerenza_simulatore_decreto_pa",
                "Incoerenza tra Simulatore e Incremento Decreto PA",
                Severity::Warning,
                false,
            )
            .values(format_eur(entered), format_eur(ceiling))
            .message("L'incremento Decreto PA inserito nel fondo dipendenti supera il valore massimo calcolato dal simulatore.")
            .citation(cite(constants, CitationKey::Art14Dl25))
            .related(RelatedSection::EmployeeFund),
        );
    }
}
