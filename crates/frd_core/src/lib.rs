//! frd_core — Core types for the fondo risorse decentrate engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`frd_io`, `frd_algo`, `frd_pipeline`, `frd_report`, `frd_cli`).
//!
//! - Line-item key sets per sub-fund (closed enums with explicit wire tokens)
//! - `InputData` and its sub-records (historical, annual, distribution)
//! - `NormativeConstants` (citations, thresholds, per-capita values)
//! - Euro helpers: half-cent tolerance, 2-decimal rounding, Italian formatting
//!
//! Wire names follow the data export of the fund tool (camelCase Italian
//! keys); Rust field names are English.

#![forbid(unsafe_code)]

pub mod input;
pub mod keys;
pub mod normative;

pub use input::InputData;
pub use keys::LineItems;
pub use normative::NormativeConstants;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        /// An amount is NaN or infinite; carries the wire key of the field.
        NonFiniteAmount(&'static str),
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::NonFiniteAmount(k) => write!(f, "non-finite amount: {k}"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod money {
    //! Euro amounts are `f64`. Absent amounts are `None` and count as zero.

    /// Half a cent. Allocation and increment comparisons tolerate this much drift.
    pub const CENT_TOLERANCE: f64 = 0.005;

    /// Round half-up to 2 decimals (cents).
    ///
    /// The epsilon nudge keeps values like `1.005` (stored as `1.00499..`) on the
    /// upper cent.
    #[inline]
    pub fn round2(v: f64) -> f64 {
        (((v + f64::EPSILON) * 100.0) + 0.5).floor() / 100.0
    }

    /// Absent counts as zero.
    #[inline]
    pub fn or_zero(v: Option<f64>) -> f64 {
        v.unwrap_or(0.0)
    }

    /// Format as Italian euro currency: `€ 1.234,56`.
    ///
    /// Cents follow [`round2`]. Two decimals, `.` thousands separator, `,` decimal separator. Negative
    /// amounts keep the sign after the symbol (`€ -12,00`). Non-finite input
    /// renders as `N/D`.
    pub fn format_eur(v: f64) -> String {
        if !v.is_finite() {
            return NOT_AVAILABLE.to_string();
        }
        let cents = (round2(v.abs()) * 100.0).round() as u64;
        let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
        format!("€ {sign}{},{:02}", group_thousands(cents / 100), cents % 100)
    }

    /// Like [`format_eur`], but `None` renders as `N/D`.
    pub fn format_eur_opt(v: Option<f64>) -> String {
        v.map(format_eur).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Plain 2-decimal rendering with a trailing euro sign: `1234.50€`.
    pub fn format_plain(v: f64) -> String {
        format!("{v:.2}€")
    }

    /// Placeholder for values that are not available.
    pub const NOT_AVAILABLE: &str = "N/D";

    fn group_thousands(n: u64) -> String {
        let digits = n.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out
    }

}
