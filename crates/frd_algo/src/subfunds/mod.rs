//! Per-sub-fund totals.
//!
//! The employee fund folds over its descriptor table; the other three use
//! closed-form expressions over their named line items.

use serde::Serialize;

pub mod employee;
pub mod eq;
pub mod executive;
pub mod secretary;

pub use employee::{employee_fund, EmployeeBreakdown};
pub use eq::{eq_fund, increment_with_reduction};
pub use executive::executive_fund;
pub use secretary::secretary_fund;

/// Stable, variable and their sum. Built only through [`SubFundTotals::new`],
/// so `total == stable + variable` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SubFundTotals {
    pub stable: f64,
    pub variable: f64,
    pub total: f64,
}

impl SubFundTotals {
    #[inline]
    pub fn new(stable: f64, variable: f64) -> Self {
        Self { stable, variable, total: stable + variable }
    }

    pub const ZERO: SubFundTotals = SubFundTotals { stable: 0.0, variable: 0.0, total: 0.0 };
}

/// One sub-fund's totals and the amount it contributes to the 2016-cap comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubFundOutcome {
    pub totals: SubFundTotals,
    pub subject_to_cap: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_sum_of_parts() {
        let t = SubFundTotals::new(1_000.25, -200.5);
        assert_eq!(t.total, 1_000.25 + -200.5);
        assert_eq!(SubFundTotals::new(0.0, 0.0), SubFundTotals::ZERO);
    }
}
