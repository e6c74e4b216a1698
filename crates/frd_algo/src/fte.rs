//! Full-time equivalents and the Art. 23 c.2 personnel-variation adjustment.
//!
//! - Each employee contributes `partTimePercentage / 100`; absent or outside
//!   [0, 100] counts as full time.
//! - Current-year employees are further prorated by `cedoliniEmessi / 12`;
//!   absent, zero or outside (0, 12] counts as a full year.
//! - adjustment = baseline2018 / fte2018 × (fteCurrent − fte2018), only when
//!   both the baseline and fte2018 are positive. Non-positive or non-finite
//!   results yield `None`.

use frd_core::input::Art23Employee;

const FULL_YEAR_PAYSLIPS: f64 = 12.0;

/// Part-time ratio in [0, 1].
#[inline]
pub fn part_time_ratio(e: &Art23Employee) -> f64 {
    match e.part_time_pct {
        Some(p) if (0.0..=100.0).contains(&p) => p / 100.0,
        _ => 1.0,
    }
}

/// Months paid out of 12, in (0, 12].
#[inline]
pub fn months_paid(e: &Art23Employee) -> f64 {
    match e.payslips {
        Some(n) if n > 0.0 && n <= FULL_YEAR_PAYSLIPS => n,
        _ => FULL_YEAR_PAYSLIPS,
    }
}

pub fn fte_2018(staff: &[Art23Employee]) -> f64 {
    staff.iter().map(part_time_ratio).sum()
}

pub fn fte_current(staff: &[Art23Employee]) -> f64 {
    staff
        .iter()
        .map(|e| part_time_ratio(e) * months_paid(e) / FULL_YEAR_PAYSLIPS)
        .sum()
}

/// Positive adjustment to the 2016 limit, or `None`.
pub fn personnel_adjustment(baseline_2018: f64, fte_2018: f64, fte_current: f64) -> Option<f64> {
    if !(baseline_2018 > 0.0 && fte_2018 > 0.0) {
        return None;
    }
    let per_capita = baseline_2018 / fte_2018;
    let adj = per_capita * (fte_current - fte_2018);
    if !adj.is_finite() {
        tracing::warn!(baseline_2018, fte_2018, fte_current, "non-finite personnel adjustment, treated as 0");
        return None;
    }
    (adj > 0.0).then_some(adj)
}

/// Adjustment computed straight from the two personnel lists.
pub fn adjustment_from_lists(
    baseline_2018: f64,
    staff_2018: &[Art23Employee],
    staff_current: &[Art23Employee],
) -> Option<f64> {
    personnel_adjustment(baseline_2018, fte_2018(staff_2018), fte_current(staff_current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full(n: usize) -> Vec<Art23Employee> {
        (0..n).map(|i| Art23Employee::full_time(format!("e{i}"))).collect()
    }

    #[test]
    fn part_time_out_of_range_counts_as_full_time() {
        let staff = vec![
            Art23Employee::part_time("a", 50.0),
            Art23Employee::part_time("b", 150.0),
            Art23Employee::part_time("c", -10.0),
            Art23Employee::full_time("d"),
        ];
        assert_eq!(fte_2018(&staff), 3.5);
    }

    #[test]
    fn current_year_is_prorated_by_payslips() {
        let staff = vec![
            Art23Employee::full_time("a").with_payslips(6.0),
            Art23Employee::part_time("b", 50.0).with_payslips(12.0),
            Art23Employee::full_time("c").with_payslips(13.0),
            Art23Employee::full_time("d").with_payslips(0.0),
        ];
        assert_eq!(fte_current(&staff), 0.5 + 0.5 + 1.0 + 1.0);
    }

    #[test]
    fn zero_payslips_keep_the_adjustment() {
        let current = vec![
            Art23Employee::full_time("a").with_payslips(0.0),
            Art23Employee::full_time("b"),
        ];
        assert_eq!(fte_current(&current), 2.0);
        assert_eq!(adjustment_from_lists(50_000.0, &full(1), &current), Some(50_000.0));
    }

    #[test]
    fn growth_yields_per_capita_adjustment() {
        let adj = adjustment_from_lists(50_000.0, &full(5), &full(6));
        assert_eq!(adj, Some(10_000.0));
    }

    #[test]
    fn shrinkage_or_missing_baseline_yields_none() {
        assert_eq!(adjustment_from_lists(50_000.0, &full(6), &full(5)), None);
        assert_eq!(adjustment_from_lists(50_000.0, &full(5), &full(5)), None);
        assert_eq!(adjustment_from_lists(0.0, &full(5), &full(6)), None);
        assert_eq!(adjustment_from_lists(50_000.0, &[], &full(6)), None);
    }

    proptest! {
        #[test]
        fn adjustment_is_absent_or_strictly_positive(
            base in -1.0e6f64..1.0e7,
            f18 in 0.0f64..200.0,
            cur in 0.0f64..200.0,
        ) {
            if let Some(a) = personnel_adjustment(base, f18, cur) {
                prop_assert!(a > 0.0 && a.is_finite());
            }
        }
    }
}
