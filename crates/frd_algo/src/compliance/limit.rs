//! Art. 23 c.2 D.Lgs. 75/2017: resources subject to the cap vs the adjusted 2016 limit.

use frd_core::money::format_eur;
use frd_core::normative::{CitationKey, NormativeConstants};

use super::{cite, Finding, RelatedSection, Severity};
use crate::aggregate::AggregateResult;

pub(super) fn check(result: &AggregateResult, constants: &NormativeConstants, out: &mut Vec<Finding>) {
    let citation = cite(constants, CitationKey::Art23Dlgs75);
    let current = format_eur(result.total_subject_to_limit);
    let limit = format_eur(result.adjusted_limit);

    let finding = match result.overage {
        Some(excess) => Finding::new(
            "limite_art23_c2",
            "Superamento limite Art. 23 c.2 D.Lgs. 75/2017 (Fondo 2016)",
            Severity::Error,
            false,
        )
        .message(format!(
            "Rilevato superamento del limite di {}. È necessario applicare una riduzione di pari importo su uno o più fondi per rispettare il vincolo.",
            format_eur(excess)
        ))
        .related(RelatedSection::FundDetails),
        None => Finding::new(
            "limite_art23_c2",
            "Rispetto limite Art. 23 c.2 D.Lgs. 75/2017 (Fondo 2016)",
            Severity::Info,
            true,
        )
        .message("Il totale delle risorse soggette al limite dei fondi specifici rispetta il tetto storico del 2016 (come modificato)."),
    };
    out.push(finding.values(current, limit).citation(citation));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use frd_core::input::InputData;
    use frd_core::keys::EmployeeItem;

    fn run(input: &InputData) -> Finding {
        let c = NormativeConstants::default();
        let r = aggregate(input, &c).unwrap();
        let mut out = Vec::new();
        check(&r, &c, &mut out);
        assert_eq!(out.len(), 1);
        out.remove(0)
    }

    #[test]
    fn zero_everything_is_compliant_with_zero_amounts() {
        let f = run(&InputData::default());
        assert_eq!(f.severity, Severity::Info);
        assert_eq!(f.current_value, "€ 0,00");
        assert_eq!(f.limit, "€ 0,00");
        assert_eq!(f.citation, "Art. 23, c. 2, D.Lgs. 75/2017");
    }

    #[test]
    fn overage_is_an_error_with_amount() {
        let mut input = InputData::default();
        input.historical.employee_fund_2016 = Some(100_000.0);
        input.employee_fund.set(EmployeeItem::TotaleParzialeConfrontoTetto2016, 101_234.56);
        let f = run(&input);
        assert_eq!(f.severity, Severity::Error);
        assert!(!f.compliant);
        assert_eq!(f.current_value, "€ 101.234,56");
        assert_eq!(f.limit, "€ 100.000,00");
        assert!(f.message.contains("€ 1.234,56"), "{}", f.message);
        assert_eq!(f.related_section, Some(RelatedSection::FundDetails));
    }
}
