//! Effective value of one employee-fund line item.
//!
//! Contract (first matching rule wins):
//! - distress-gated key while the entity is in distress -> 0
//! - PA-decree increment -> stored value iff the simulator ceiling is > 0, else 0
//!   (gated on/off, never clamped to the ceiling)
//! - EQ-triggered reduction -> the EQ fund's increment-with-reduction
//! - otherwise the stored value, absent = 0

use frd_core::input::InputData;
use frd_core::keys::{EmployeeItem, LineItems};

use crate::descriptors::descriptor;

/// The inputs effective-value resolution depends on besides the stored amount.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectiveContext {
    pub in_distress: bool,
    /// Simulator's net effective increment for the year, if reported.
    pub simulator_ceiling: Option<f64>,
    /// Mirrors the EQ fund's "increment with reduction of the employee fund".
    pub eq_increment_with_reduction: f64,
}

impl EffectiveContext {
    pub fn from_input(input: &InputData, eq_increment_with_reduction: f64) -> Self {
        Self {
            in_distress: input.annual.in_distress(),
            simulator_ceiling: input.annual.simulator_ceiling(),
            eq_increment_with_reduction,
        }
    }

    #[inline]
    fn ceiling_open(&self) -> bool {
        self.simulator_ceiling.map_or(false, |c| c > 0.0)
    }
}

/// Unsigned effective amount; the descriptor applies the sign.
pub fn effective_value(
    key: EmployeeItem,
    items: &LineItems<EmployeeItem>,
    ctx: &EffectiveContext,
) -> f64 {
    if ctx.in_distress && descriptor(key).disabled_under_distress {
        return 0.0;
    }
    match key {
        EmployeeItem::IncrementoDecretoPa => {
            if ctx.ceiling_open() {
                items.value(key)
            } else {
                0.0
            }
        }
        EmployeeItem::RiduzionePerIncrementoEq => ctx.eq_increment_with_reduction,
        _ => items.value(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> LineItems<EmployeeItem> {
        LineItems::new()
            .with(EmployeeItem::IncrementoDecretoPa, 20_000.0)
            .with(EmployeeItem::MonteSalari1997, 3_000.0)
            .with(EmployeeItem::RiduzionePerIncrementoEq, 999.0)
            .with(EmployeeItem::Euro8450, 8_450.0)
    }

    #[test]
    fn plain_keys_read_stored_value_or_zero() {
        let ctx = EffectiveContext::default();
        assert_eq!(effective_value(EmployeeItem::Euro8450, &items(), &ctx), 8_450.0);
        assert_eq!(effective_value(EmployeeItem::IntegrazioneRia, &items(), &ctx), 0.0);
    }

    #[test]
    fn decree_increment_is_gated_by_positive_ceiling() {
        let closed = EffectiveContext { simulator_ceiling: Some(0.0), ..Default::default() };
        let absent = EffectiveContext::default();
        let open = EffectiveContext { simulator_ceiling: Some(5_000.0), ..Default::default() };
        let k = EmployeeItem::IncrementoDecretoPa;
        assert_eq!(effective_value(k, &items(), &closed), 0.0);
        assert_eq!(effective_value(k, &items(), &absent), 0.0);
        // gated, not clamped
        assert_eq!(effective_value(k, &items(), &open), 20_000.0);
    }

    #[test]
    fn distress_wins_over_ceiling() {
        let ctx = EffectiveContext {
            in_distress: true,
            simulator_ceiling: Some(50_000.0),
            ..Default::default()
        };
        assert_eq!(effective_value(EmployeeItem::IncrementoDecretoPa, &items(), &ctx), 0.0);
        assert_eq!(effective_value(EmployeeItem::MonteSalari1997, &items(), &ctx), 0.0);
        assert_eq!(effective_value(EmployeeItem::Euro8450, &items(), &ctx), 8_450.0);
    }

    #[test]
    fn eq_reduction_mirrors_supplied_amount() {
        let ctx = EffectiveContext { eq_increment_with_reduction: 1_500.0, ..Default::default() };
        assert_eq!(
            effective_value(EmployeeItem::RiduzionePerIncrementoEq, &items(), &ctx),
            1_500.0
        );
    }
}
