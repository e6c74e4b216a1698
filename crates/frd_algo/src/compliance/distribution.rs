//! Distribution-mode checks: employee fund uses vs total, EQ allocations vs EQ total.

use frd_core::input::InputData;
use frd_core::keys::{AllocationItem, EqItem};
use frd_core::money::{format_eur, CENT_TOLERANCE};
use frd_core::normative::{CitationKey, NormativeConstants};

use super::{cite, Finding, RelatedSection, Severity};
use crate::aggregate::AggregateResult;
use crate::subfunds::eq::ALLOCATIONS as EQ_ALLOCATIONS;

// ---------- Employee fund ----------

pub(super) fn check_employee(
    result: &AggregateResult,
    input: &InputData,
    constants: &NormativeConstants,
    out: &mut Vec<Finding>,
) {
    let total = result.employee.total;
    if total <= 0.0 {
        return;
    }
    let d = &input.distribution;
    let stable_uses = d.stable_uses();
    let allocated = stable_uses + d.variable_uses();
    let remainder = total - allocated;
    let available = total - stable_uses;

    if stable_uses > total {
        out.push(
            Finding::new(
                "distribuzione_stabile_supera_totale",
                "Costi Parte Stabile superano le Risorse Disponibili",
                Severity::Error,
                false,
            )
            .values(format_eur(stable_uses), format_eur(total))
            .message("I costi fissi della Parte Stabile superano il totale da distribuire. Impossibile procedere con l'allocazione della parte variabile.")
            .citation(cite(constants, CitationKey::SoundFinancialManagement))
            .related(RelatedSection::Distribution),
        );
    }

    let budget = if remainder < -CENT_TOLERANCE {
        Finding::new(
            "distribuzione_superamento_budget",
            "Superamento del budget nella Distribuzione Risorse Dipendenti",
            Severity::Error,
            false,
        )
        .message(format!(
            "L'importo totale allocato per il personale dipendente supera le risorse disponibili di {}.",
            format_eur(remainder.abs())
        ))
        .related(RelatedSection::Distribution)
    } else {
        Finding::new(
            "distribuzione_rispetto_budget",
            "Rispetto del budget nella Distribuzione Risorse Dipendenti",
            Severity::Info,
            true,
        )
        .message(format!(
            "L'allocazione delle risorse per il personale dipendente rispetta il budget. Rimanenza: {}.",
            format_eur(remainder)
        ))
    };
    out.push(
        budget
            .values(format_eur(allocated), format_eur(total))
            .citation(cite(constants, CitationKey::Art80Ccnl2022)),
    );

    if available > 0.0 {
        let pct = constants.limits.min_individual_performance_pct;
        let individual = d.allocated(AllocationItem::PerformanceIndividuale)
            + d.allocated(AllocationItem::MaggiorazionePerformanceIndividuale);
        let minimum = available * pct / 100.0;
        let ok = individual >= minimum;
        let message = if ok {
            format!("La quota destinata alla performance individuale (inclusa maggiorazione) rispetta il minimo del {pct}% delle risorse disponibili alla contrattazione.")
        } else {
            format!("La quota destinata alla performance individuale (inclusa maggiorazione) è inferiore al minimo obbligatorio del {pct}% delle risorse disponibili alla contrattazione.")
        };
        out.push(
            Finding::new(
                "verifica_quota_minima_performance_individuale",
                "Verifica Quota Minima Performance Individuale (Art. 80 CCNL 2022)",
                if ok { Severity::Info } else { Severity::Error },
                ok,
            )
            .values(format_eur(individual), format!("≥ {}", format_eur(minimum)))
            .message(message)
            .citation(cite(constants, CitationKey::Art80PenultimateCcnl2022))
            .related(RelatedSection::Distribution),
        );
    }
}

// ---------- EQ fund ----------

pub(super) fn check_eq(
    result: &AggregateResult,
    input: &InputData,
    constants: &NormativeConstants,
    out: &mut Vec<Finding>,
) {
    let total = result.eq.total;
    if total <= 0.0 {
        return;
    }
    let allocated = input.eq_fund.sum_of(&EQ_ALLOCATIONS);
    let sound = cite(constants, CitationKey::SoundFinancialManagement);

    let budget = if allocated > total {
        Finding::new(
            "distribuzione_eq_superamento_budget",
            "Superamento budget nella Distribuzione Risorse EQ",
            Severity::Error,
            false,
        )
        .message(format!(
            "La somma delle retribuzioni di posizione e risultato per le EQ supera il fondo disponibile di {}.",
            format_eur(allocated - total)
        ))
        .related(RelatedSection::Distribution)
    } else {
        Finding::new(
            "distribuzione_eq_rispetto_budget",
            "Rispetto del budget nella Distribuzione Risorse EQ",
            Severity::Info,
            true,
        )
        .message("L'allocazione delle risorse per le EQ rispetta il budget.")
    };
    out.push(budget.values(format_eur(allocated), format_eur(total)).citation(sound));

    let pct = constants.limits.min_eq_result_pct;
    let minimum = total * pct / 100.0;
    let result_pay = input.eq_fund.value(EqItem::RetribuzioneRisultato);
    if result_pay < minimum {
        out.push(
            Finding::new(
                "verifica_quota_minima_risultato_eq",
                "Verifica quota minima Retribuzione di Risultato EQ",
                Severity::Warning,
                false,
            )
            .values(format_eur(result_pay), format!("≥ {}", format_eur(minimum)))
            .message(format!(
                "La quota destinata alla retribuzione di risultato è inferiore al {pct}% minimo previsto dal CCNL."
            ))
            .citation(format!("{} c.4", cite(constants, CitationKey::Art17Ccnl2022)))
            .related(RelatedSection::Distribution),
        );
    }
}
