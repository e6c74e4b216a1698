//! Executive (dirigenza) fund. Zero unless the entity has executive personnel.

use frd_core::keys::{ExecutiveItem, LineItems};

use super::{SubFundOutcome, SubFundTotals};

const STABLE: [ExecutiveItem; 6] = [
    ExecutiveItem::UnicoImporto2020,
    ExecutiveItem::RiaPersonaleCessato2020,
    ExecutiveItem::IncrementoMonteSalari2015,
    ExecutiveItem::RiaCessatiAnnoSuccessivo,
    ExecutiveItem::RisorseAutonomeStabili,
    ExecutiveItem::IncrementoMonteSalari2018,
];

const VARIABLE: [ExecutiveItem; 9] = [
    ExecutiveItem::RisorseLeggeSponsor,
    ExecutiveItem::SommeOnnicomprensivita,
    ExecutiveItem::RisorseAutonomeVariabili,
    ExecutiveItem::ResiduiAnnoPrecedente,
    ExecutiveItem::IncrementoPnrr,
    ExecutiveItem::Recupero046MonteSalari2018,
    ExecutiveItem::Recupero201MonteSalari2018,
    ExecutiveItem::Valorizzazione022MonteSalari2018,
    ExecutiveItem::IncrementoDerogaDl34,
];

pub fn executive_fund(items: &LineItems<ExecutiveItem>, has_executives: bool) -> SubFundOutcome {
    if !has_executives {
        return SubFundOutcome::default();
    }
    let stable = items.sum_of(&STABLE) + items.value(ExecutiveItem::AdeguamentoAnnualeTetto2016)
        - items.value(ExecutiveItem::MisureMancatoRispettoVincoli);
    let variable = items.sum_of(&VARIABLE);
    SubFundOutcome {
        totals: SubFundTotals::new(stable, variable),
        subject_to_cap: items.value(ExecutiveItem::TotaleParzialeConfrontoTetto2016),
    }
}
