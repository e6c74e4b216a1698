//! frd_algo — Pure algorithms of the FRD engine.
//!
//! Two entry points, both free of I/O and shared state:
//! - [`aggregate`]: InputData + constants -> [`AggregateResult`]
//! - [`check_compliance`]: result + InputData + constants -> ordered findings
//!
//! Supporting modules: the employee line-item descriptor table, effective
//! value resolution, closed-form sub-fund formulas, and FTE counting for the
//! Art. 23 c.2 personnel-variation adjustment.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod compliance;
pub mod descriptors;
pub mod effective;
pub mod fte;
pub mod subfunds;

pub use aggregate::{aggregate, AggregateResult, ComponentKind, FundComponent};
pub use compliance::{check_compliance, Finding, RelatedSection, Severity};
pub use subfunds::SubFundTotals;
