//! High-qualification (EQ) fund.
//!
//! stable = PO 2017 + increment-with-reduction + DL34 increment − 2016 cap adjustment;
//! variable = 0.22% of the 2018 salary mass. The cap amount is the first three
//! items, before the adjustment.

use frd_core::keys::{EqItem, LineItems};

use super::{SubFundOutcome, SubFundTotals};

const CAPPED: [EqItem; 3] = [
    EqItem::FondoPo2017,
    EqItem::IncrementoConRiduzioneFondoDipendenti,
    EqItem::IncrementoLimiteDl34,
];

/// Allocation items compared against the EQ total in distribution mode.
pub const ALLOCATIONS: [EqItem; 5] = [
    EqItem::RetribuzionePosizione,
    EqItem::RetribuzionePosizioneArt16,
    EqItem::InterimEq,
    EqItem::MaggiorazioneSedi,
    EqItem::RetribuzioneRisultato,
];

/// Amount moved from the employee fund into the EQ fund; mirrored as a
/// reduction line of the employee fund.
#[inline]
pub fn increment_with_reduction(items: &LineItems<EqItem>) -> f64 {
    items.value(EqItem::IncrementoConRiduzioneFondoDipendenti)
}

pub fn eq_fund(items: &LineItems<EqItem>) -> SubFundOutcome {
    let capped = items.sum_of(&CAPPED);
    let stable = capped - items.value(EqItem::AdeguamentoTetto2016);
    let variable = items.value(EqItem::IncrementoMonteSalari2018);
    SubFundOutcome { totals: SubFundTotals::new(stable, variable), subject_to_cap: capped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_amount_ignores_adjustment() {
        let items = LineItems::new()
            .with(EqItem::FondoPo2017, 20_000.0)
            .with(EqItem::IncrementoConRiduzioneFondoDipendenti, 1_500.0)
            .with(EqItem::IncrementoLimiteDl34, 500.0)
            .with(EqItem::AdeguamentoTetto2016, 1_000.0)
            .with(EqItem::IncrementoMonteSalari2018, 300.0)
            .with(EqItem::RetribuzioneRisultato, 4_000.0);
        let out = eq_fund(&items);
        assert_eq!(out.totals.stable, 21_000.0);
        assert_eq!(out.totals.variable, 300.0);
        assert_eq!(out.subject_to_cap, 22_000.0);
        assert_eq!(increment_with_reduction(&items), 1_500.0);
    }

    #[test]
    fn allocations_do_not_feed_totals() {
        let items = LineItems::new().with(EqItem::RetribuzionePosizione, 9_000.0);
        assert_eq!(eq_fund(&items).totals, SubFundTotals::ZERO);
    }
}
