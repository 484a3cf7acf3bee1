//! # Money Coercion Module
//!
//! Fail-soft coercion of loosely-typed input into non-negative `Decimal`
//! amounts, plus percentage arithmetic.
//!
//! ## The Fail-Soft Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INGESTION IS BEST-EFFORT                                               │
//! │                                                                         │
//! │  Spreadsheet cells and form fields arrive as strings, numbers, blanks  │
//! │  or garbage. Coercion NEVER fails:                                     │
//! │                                                                         │
//! │    "123.45"  → 123.45                                                  │
//! │    42        → 42                                                      │
//! │    "abc"     → 0                                                       │
//! │    (missing) → 0                                                       │
//! │    -7        → 0   (money is non-negative)                             │
//! │                                                                         │
//! │  Hard failures are the SCHEMA VALIDATOR's job, which runs on the raw   │
//! │  values BEFORE this coercion is applied.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precision
//! Internal state keeps full `Decimal` precision so repeated recomputation
//! never compounds rounding error. Rounding to two decimal places happens
//! only at the presentation boundary ([`round_display`] / [`format_inr`]).

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

// =============================================================================
// Fail-Soft Parsing
// =============================================================================

/// Coerces an arbitrary cell/field value into a non-negative amount.
///
/// ## Behavior
/// - JSON numbers are taken as-is (integers exactly, floats via conversion)
/// - JSON strings are trimmed and parsed as a decimal literal
/// - Anything else (null, bool, missing, unparseable text) yields `0`
/// - Negative results are clamped to `0`
///
/// This is a deliberate policy, not a shortcut: the import pipeline validates
/// raw values first, then coerces. Tightening this into a hard failure would
/// change the ingestion contract.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use serde_json::json;
/// use stockbook_core::money::parse_amount;
///
/// assert_eq!(parse_amount(Some(&json!("123.45"))), Decimal::new(12345, 2));
/// assert_eq!(parse_amount(Some(&json!("oops"))), Decimal::ZERO);
/// assert_eq!(parse_amount(None), Decimal::ZERO);
/// ```
pub fn parse_amount(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Some(Value::String(s)) => parse_decimal_str(s),
        _ => None,
    };

    parsed.unwrap_or(Decimal::ZERO).max(Decimal::ZERO)
}

/// Coerces an arbitrary value into a non-negative percentage.
///
/// Same coercion as [`parse_amount`]; a separate name keeps call sites
/// readable (`parse_percent(row.get("itemGSTPer"))`). The result is a plain
/// percentage value (18 means 18%), not a fraction.
#[inline]
pub fn parse_percent(value: Option<&Value>) -> Decimal {
    parse_amount(value)
}

/// Parses a trimmed string as a decimal, accepting scientific notation.
fn parse_decimal_str(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

// =============================================================================
// Percentage Arithmetic
// =============================================================================

/// Applies a percentage to a base amount: `base * pct / 100`.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use stockbook_core::money::apply_percent;
///
/// let base = Decimal::from(5000);
/// let gst = apply_percent(base, Decimal::from(18));
/// assert_eq!(gst, Decimal::from(900));
/// ```
#[inline]
pub fn apply_percent(base: Decimal, pct: Decimal) -> Decimal {
    base * pct / Decimal::ONE_HUNDRED
}

// =============================================================================
// Presentation Boundary
// =============================================================================

/// Rounds an amount to two decimal places for display.
///
/// Internal state is never stored rounded; this is strictly for the
/// presentation boundary (summaries, previews, logs).
#[inline]
pub fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Formats an amount as an INR display string, e.g. `₹5900.00`.
pub fn format_inr(amount: Decimal) -> String {
    format!("₹{:.2}", round_display(amount))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount_from_string() {
        assert_eq!(parse_amount(Some(&json!("123.45"))), Decimal::new(12345, 2));
        assert_eq!(parse_amount(Some(&json!("  50 "))), Decimal::from(50));
        assert_eq!(parse_amount(Some(&json!("1.5e2"))), Decimal::from(150));
    }

    #[test]
    fn test_parse_amount_from_number() {
        assert_eq!(parse_amount(Some(&json!(42))), Decimal::from(42));
        assert_eq!(parse_amount(Some(&json!(12.5))), Decimal::new(125, 1));
    }

    #[test]
    fn test_parse_amount_fails_soft_to_zero() {
        assert_eq!(parse_amount(Some(&json!("abc"))), Decimal::ZERO);
        assert_eq!(parse_amount(Some(&json!(""))), Decimal::ZERO);
        assert_eq!(parse_amount(Some(&json!(null))), Decimal::ZERO);
        assert_eq!(parse_amount(Some(&json!(true))), Decimal::ZERO);
        assert_eq!(parse_amount(None), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_clamps_negative() {
        assert_eq!(parse_amount(Some(&json!(-7))), Decimal::ZERO);
        assert_eq!(parse_amount(Some(&json!("-12.50"))), Decimal::ZERO);
    }

    #[test]
    fn test_apply_percent() {
        let base = Decimal::from(5000);
        assert_eq!(apply_percent(base, Decimal::from(18)), Decimal::from(900));
        assert_eq!(apply_percent(base, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            apply_percent(Decimal::ZERO, Decimal::from(18)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_round_display_only_at_boundary() {
        // A third of 100 keeps its full precision internally
        let third = Decimal::from(100) / Decimal::from(3);
        assert_ne!(third, round_display(third));
        assert_eq!(round_display(third), Decimal::new(3333, 2));
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(Decimal::from(5900)), "₹5900.00");
        assert_eq!(format_inr(Decimal::new(123456, 2)), "₹1234.56");
        assert_eq!(format_inr(Decimal::ZERO), "₹0.00");
    }
}
