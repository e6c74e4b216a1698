//! Municipal secretary fund. Both components scale by the post coverage
//! percentage (absent = 100); the cap amount is entered directly and is not scaled.

use frd_core::keys::{LineItems, SecretaryItem};

use super::{SubFundOutcome, SubFundTotals};

const STABLE: [SecretaryItem; 7] = [
    SecretaryItem::RetribuzionePosizione2011,
    SecretaryItem::DifferenzialeAumento,
    SecretaryItem::RetribuzionePosizioneClassi,
    SecretaryItem::MaggiorazioneComplessita,
    SecretaryItem::AllineamentoDirigenzaEq,
    SecretaryItem::RetribuzioneAggiuntivaConvenzioni,
    SecretaryItem::IndennitaReggenzaSupplenza,
];

const VARIABLE: [SecretaryItem; 7] = [
    SecretaryItem::DirittiSegreteria,
    SecretaryItem::AltriCompensiLegge,
    SecretaryItem::IncrementoPnrr,
    SecretaryItem::RetribuzioneRisultato10,
    SecretaryItem::RetribuzioneRisultato15,
    SecretaryItem::SuperamentoLimiteMetropolitane,
    SecretaryItem::IncrementoMonteSalari2018,
];

const FULL_COVERAGE: f64 = 100.0;

pub fn secretary_fund(items: &LineItems<SecretaryItem>) -> SubFundOutcome {
    let coverage = items.get(SecretaryItem::PercentualeCopertura).unwrap_or(FULL_COVERAGE) / 100.0;
    let stable = items.sum_of(&STABLE) * coverage;
    let variable = items.sum_of(&VARIABLE) * coverage;
    SubFundOutcome {
        totals: SubFundTotals::new(stable, variable),
        subject_to_cap: items.value(SecretaryItem::TotaleRisorseRilevantiLimite),
    }
}
