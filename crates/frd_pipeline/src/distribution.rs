//! Derived defaults of the resource distribution record.
//!
//! The three performance allocations follow the distribution criteria
//! unless the user overrode them:
//! - uplift (`p_maggiorazionePerformanceIndividuale`) first, from the amount
//!   available for bargaining and the bonus-recipient share of the headcount;
//! - then individual / organizational performance, splitting what is left of
//!   the variable budget after the other `p_*` allocations and the uplift.
//!
//! Outside final-accounts mode only the allocated amounts are meaningful, so
//! savings and on-budget amounts are cleared.

use frd_core::input::{AllocationDetail, DistributionData};
use frd_core::keys::AllocationItem;
use frd_core::money::round2;

/// Amounts the derivation worked from, kept for logs and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerformanceBudget {
    /// Employee fund total minus the fixed stable-part uses.
    pub available: f64,
    /// `available` minus the non-derived `p_*` allocations, floored at zero.
    pub budget: f64,
    /// `budget` minus the uplift.
    pub effective: f64,
}

/// Recompute the non-overridden performance allocations in place.
///
/// `employee_total` is the employee fund total; `headcount` the number of
/// non-executive employees.
pub fn derive_performance_defaults(
    dist: &mut DistributionData,
    employee_total: f64,
    headcount: f64,
) -> PerformanceBudget {
    let available = employee_total - dist.stable_uses();
    let other: f64 = dist
        .allocations
        .iter()
        .filter(|(item, _)| !item.is_derived())
        .map(|(_, d)| d.allocated_or_zero())
        .sum();
    let budget = (available - other).max(0.0);

    let perc_ind = dist.individual_performance_pct.unwrap_or(0.0);
    let perc_uplift = dist.bonus_uplift_pct.unwrap_or(0.0);
    let perc_recipients = dist.bonus_recipients_pct.unwrap_or(0.0);

    let per_capita_uplift = if headcount > 0.0 {
        available * (perc_ind / 100.0) / headcount * (perc_uplift / 100.0)
    } else {
        0.0
    };
    let recipients = (headcount * perc_recipients / 100.0).ceil();
    set_unless_overridden(
        dist,
        AllocationItem::MaggiorazionePerformanceIndividuale,
        round2(per_capita_uplift * recipients),
    );

    let effective = budget - dist.allocated(AllocationItem::MaggiorazionePerformanceIndividuale);
    set_unless_overridden(dist, AllocationItem::PerformanceIndividuale, round2(effective * perc_ind / 100.0));
    set_unless_overridden(
        dist,
        AllocationItem::PerformanceOrganizzativa,
        round2(effective * (100.0 - perc_ind) / 100.0),
    );

    tracing::debug!(available, budget, effective, recipients, "performance allocations derived");
    PerformanceBudget { available, budget, effective }
}

fn set_unless_overridden(dist: &mut DistributionData, item: AllocationItem, amount: f64) {
    if !amount.is_finite() {
        tracing::warn!(item = item.as_str(), "derived allocation is not finite, left unchanged");
        return;
    }
    let detail = dist.allocations.entry(item).or_default();
    if !detail.manually_overridden {
        detail.allocated = Some(amount);
    }
}

/// Clear savings and on-budget amounts unless in final-accounts mode.
pub fn normalize_for_mode(dist: &mut DistributionData) {
    if dist.final_accounts_mode.unwrap_or(false) {
        return;
    }
    let details = dist
        .allocations
        .values_mut()
        .chain(dist.educators_allowance.as_mut())
        .chain(dist.school_staff_allowance.as_mut())
        .chain(dist.former_8qf_allowance.as_mut());
    for d in details {
        clear_final_amounts(d);
    }
}

fn clear_final_amounts(d: &mut AllocationDetail) {
    d.savings = None;
    d.on_budget = None;
}
