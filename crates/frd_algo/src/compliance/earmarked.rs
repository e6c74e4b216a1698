//! Earmarked sources of the employee fund vs the allocations that spend them.

use frd_core::input::InputData;
use frd_core::keys::{AllocationItem, EmployeeItem};
use frd_core::money::format_eur;
use frd_core::normative::{CitationKey, NormativeConstants};

use super::{cite, Finding, RelatedSection, Severity};

/// One earmarked source and the allocation rows that may use it.
#[derive(Debug, Clone, Copy)]
pub struct EarmarkedPair {
    pub source: EmployeeItem,
    pub uses: &'static [AllocationItem],
    pub description: &'static str,
    pub citation: CitationKey,
}

pub const EARMARKED_PAIRS: [EarmarkedPair; 4] = [
    EarmarkedPair {
        source: EmployeeItem::RimborsoSpeseNotifica,
        uses: &[AllocationItem::CompensiMessiNotificatori],
        description: "Corrispondenza Risorse Messi Notificatori",
        citation: CitationKey::Art54Ccnl1999,
    },
    EarmarkedPair {
        source: EmployeeItem::PersonaleCaseGioco,
        uses: &[AllocationItem::CompensiCaseGioco],
        description: "Corrispondenza Risorse Personale Case da Gioco",
        citation: CitationKey::Art67c3gCcnl2018,
    },
    EarmarkedPair {
        source: EmployeeItem::IncentiviRiscossioneImuTari,
        uses: &[AllocationItem::IncentiviImuTari],
        description: "Corrispondenza Risorse Incentivi IMU/TARI",
        citation: CitationKey::L145Art1c1091,
    },
    EarmarkedPair {
        source: EmployeeItem::IncentiviTecniciCondoni,
        uses: &[
            AllocationItem::IncentiviFunzioniTecnichePost2018,
            AllocationItem::IncentiviCondonoFunzioniTecnichePre2018,
        ],
        description: "Corrispondenza Risorse Incentivi Funzioni Tecniche",
        citation: CitationKey::Art45Dlgs36,
    },
];

pub(super) fn check(input: &InputData, constants: &NormativeConstants, out: &mut Vec<Finding>) {
    for pair in &EARMARKED_PAIRS {
        let source = input.employee_fund.value(pair.source);
        let used: f64 = pair.uses.iter().map(|u| input.distribution.allocated(*u)).sum();
        let id = format!("corrispondenza_{}", pair.source.as_str());
        let current = format!("Fonte: {}, Uso: {}", format_eur(source), format_eur(used));

        let finding = if used > source {
            Finding::new(id, pair.description, Severity::Error, false)
                .message(format!(
                    "L'importo distribuito per questa finalità ({}) supera la fonte dedicata ({}). Questo costituisce un'errata imputazione delle risorse.",
                    format_eur(used),
                    format_eur(source)
                ))
                .related(RelatedSection::Distribution)
        } else if source > 0.0 && used < source {
            Finding::new(id, pair.description, Severity::Warning, true)
                .message(format!(
                    "Non tutte le risorse della fonte dedicata ({}) sono state allocate per questa finalità. Si suggerisce di verificare la corretta allocazione di {}.",
                    format_eur(source),
                    format_eur(source - used)
                ))
                .related(RelatedSection::Distribution)
        } else {
            Finding::new(id, pair.description, Severity::Info, true)
                .message("Le risorse stanziate corrispondono a quelle allocate.")
        };
        out.push(finding.values(current, "Uso <= Fonte").citation(cite(constants, pair.citation)));
    }
}
