//! # Line-Item Tax Calculator
//!
//! Computes a single line item's taxable amount, discount, and jurisdictional
//! GST split.
//!
//! ## Computation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line-Item Tax Calculation                            │
//! │                                                                         │
//! │  units × unit_cost                                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  − discount (discount_percent of base)                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  taxable_amount ──► gst = taxable × gst_percent / 100                  │
//! │        │                          │                                     │
//! │        │            ┌─────────────┴─────────────┐                       │
//! │        │            │ interstate?               │                       │
//! │        │            │  yes: igst = gst          │                       │
//! │        │            │  no:  sgst = cgst = gst/2 │                       │
//! │        │            └─────────────┬─────────────┘                       │
//! │        ▼                          ▼                                     │
//! │  total_amount = taxable_amount + gst                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recomputation is idempotent: the derived fields are a pure function of the
//! editable fields plus the order's interstate flag.

use rust_decimal::Decimal;

use crate::money::apply_percent;
use crate::types::LineItem;

// =============================================================================
// GST Breakdown
// =============================================================================

/// The derived money fields for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GstBreakdown {
    pub taxable_amount: Decimal,
    pub sgst: Decimal,
    pub cgst: Decimal,
    pub igst: Decimal,
    pub total_amount: Decimal,
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes the GST breakdown for one line item.
///
/// ## Input Normalization
/// - Negative `units` or `unit_cost` are clamped to zero before computation;
///   negative quantity/cost must never propagate into money fields.
/// - `discount_percent` is clamped to `[0, 100]`. The UI layer should already
///   constrain it; clamping here keeps a >100% discount from driving the
///   taxable amount negative.
/// - `gst_percent` is taken as given (authoritative once fetched from the
///   tax lookup collaborator).
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use stockbook_core::tax::compute_line;
///
/// let b = compute_line(
///     Decimal::from(100), // units
///     Decimal::from(50),  // unit cost
///     Decimal::ZERO,      // discount %
///     Decimal::from(18),  // GST %
///     false,              // intrastate
/// );
/// assert_eq!(b.taxable_amount, Decimal::from(5000));
/// assert_eq!(b.sgst, Decimal::from(450));
/// assert_eq!(b.cgst, Decimal::from(450));
/// assert_eq!(b.igst, Decimal::ZERO);
/// assert_eq!(b.total_amount, Decimal::from(5900));
/// ```
pub fn compute_line(
    units: Decimal,
    unit_cost: Decimal,
    discount_percent: Decimal,
    gst_percent: Decimal,
    inter_state: bool,
) -> GstBreakdown {
    let units = units.max(Decimal::ZERO);
    let unit_cost = unit_cost.max(Decimal::ZERO);
    let discount_percent = discount_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    let base = units * unit_cost;
    let taxable_amount = base - apply_percent(base, discount_percent);
    let gst = apply_percent(taxable_amount, gst_percent);

    let (sgst, cgst, igst) = if inter_state {
        (Decimal::ZERO, Decimal::ZERO, gst)
    } else {
        let half = gst / Decimal::TWO;
        (half, half, Decimal::ZERO)
    };

    GstBreakdown {
        taxable_amount,
        sgst,
        cgst,
        igst,
        total_amount: taxable_amount + gst,
    }
}

/// Re-derives a line item's computed fields from its editable fields.
///
/// Returns a new item; the input is not mutated anywhere else.
pub fn derive_item(item: &LineItem, inter_state: bool) -> LineItem {
    let breakdown = compute_line(
        item.units,
        item.unit_cost,
        item.discount_percent,
        item.gst_percent,
        inter_state,
    );

    LineItem {
        taxable_amount: breakdown.taxable_amount,
        sgst: breakdown.sgst,
        cgst: breakdown.cgst,
        igst: breakdown.igst,
        total_amount: breakdown.total_amount,
        ..item.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_intrastate_split() {
        // units=100, unitCost=50, gst=18%, intrastate
        let b = compute_line(dec(100), dec(50), Decimal::ZERO, dec(18), false);
        assert_eq!(b.taxable_amount, dec(5000));
        assert_eq!(b.sgst, dec(450));
        assert_eq!(b.cgst, dec(450));
        assert_eq!(b.igst, Decimal::ZERO);
        assert_eq!(b.total_amount, dec(5900));
    }

    #[test]
    fn test_interstate_split() {
        // Same item, interstate: the whole GST moves to IGST
        let b = compute_line(dec(100), dec(50), Decimal::ZERO, dec(18), true);
        assert_eq!(b.igst, dec(900));
        assert_eq!(b.sgst, Decimal::ZERO);
        assert_eq!(b.cgst, Decimal::ZERO);
        assert_eq!(b.total_amount, dec(5900));
    }

    #[test]
    fn test_discount_applies_before_gst() {
        // 10% discount: taxable 4500, GST 810, total 5310
        let b = compute_line(dec(100), dec(50), dec(10), dec(18), false);
        assert_eq!(b.taxable_amount, dec(4500));
        assert_eq!(b.sgst, dec(405));
        assert_eq!(b.cgst, dec(405));
        assert_eq!(b.total_amount, dec(5310));
    }

    #[test]
    fn test_negative_units_and_cost_clamped() {
        let b = compute_line(dec(-3), dec(50), Decimal::ZERO, dec(18), false);
        assert_eq!(b.taxable_amount, Decimal::ZERO);
        assert_eq!(b.total_amount, Decimal::ZERO);

        let b = compute_line(dec(3), dec(-50), Decimal::ZERO, dec(18), false);
        assert_eq!(b.total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_discount_clamped_to_valid_range() {
        // 150% discount behaves as 100%: nothing taxable, nothing due
        let b = compute_line(dec(100), dec(50), dec(150), dec(18), false);
        assert_eq!(b.taxable_amount, Decimal::ZERO);
        assert_eq!(b.total_amount, Decimal::ZERO);

        // negative discount behaves as 0%
        let b = compute_line(dec(100), dec(50), dec(-20), dec(18), false);
        assert_eq!(b.taxable_amount, dec(5000));
    }

    #[test]
    fn test_zero_gst() {
        let b = compute_line(dec(10), dec(10), Decimal::ZERO, Decimal::ZERO, false);
        assert_eq!(b.taxable_amount, dec(100));
        assert_eq!(b.total_amount, dec(100));
        assert_eq!(b.sgst, Decimal::ZERO);
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let item = LineItem {
            name: "Raw Material A".to_string(),
            units: dec(100),
            unit_cost: dec(50),
            discount_percent: dec(5),
            gst_percent: dec(18),
            ..LineItem::blank()
        };

        let once = derive_item(&item, false);
        let twice = derive_item(&once, false);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fractional_units_keep_precision() {
        // 2.5 units at 9.99: taxable 24.975 stays unrounded internally
        let b = compute_line(
            Decimal::new(25, 1),
            Decimal::new(999, 2),
            Decimal::ZERO,
            dec(18),
            false,
        );
        assert_eq!(b.taxable_amount, Decimal::new(24975, 3));
    }
}
