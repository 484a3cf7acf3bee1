//! # Order Value & Aggregator
//!
//! The order-in-progress as an explicit immutable value with pure transition
//! functions. The UI layer owns the mutable slot; this module owns the rules.
//!
//! ## Transition Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Order Transitions                                   │
//! │                                                                         │
//! │   Order::new(kind) ──► one blank LineItem, zero totals                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   apply_item_edit ─┐                                                    │
//! │   add_item        ─┼──► re-derive EVERY item ──► re-fold totals        │
//! │   remove_item     ─┤    (tax calculator)         (pure fold)           │
//! │   with_inter_state─┘                                                    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   submit (external) ──► reset() ──► fresh blank order                  │
//! │                                                                         │
//! │   Every transition returns a NEW value. No hidden state is carried     │
//! │   between recomputations; aggregation is a fold over the item list.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::tax::derive_item;
use crate::types::{HsnDetails, LineItem, OrderKind, PartyDetails};

// =============================================================================
// Order
// =============================================================================

/// A purchase or sales order being edited or imported.
///
/// ## Invariants
/// - `tax_amt = Σ (sgst + cgst + igst)` over all items
/// - `final_amt = Σ total_amount` over all items
/// - An order with zero items has `tax_amt = final_amt = 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub kind: OrderKind,
    pub party: PartyDetails,
    pub invoice_no: String,
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub items: Vec<LineItem>,
    #[serde(rename = "warehouseID")]
    pub warehouse_id: Option<String>,
    pub is_inter_state: bool,
    #[ts(type = "number")]
    pub tax_amt: Decimal,
    #[ts(type = "number")]
    pub final_amt: Decimal,
}

/// An edit to one editable field of a line item.
///
/// Derived fields are not editable; they are recomputed after every edit.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEdit {
    Name(String),
    ItemCode(String),
    HsnCode(String),
    Units(Decimal),
    UnitCost(Decimal),
    DiscountPercent(Decimal),
    GstPercent(Decimal),
}

impl Order {
    /// Creates a fresh order with one blank line item.
    pub fn new(kind: OrderKind) -> Self {
        Order {
            kind,
            party: PartyDetails::default(),
            invoice_no: String::new(),
            date: None,
            items: vec![LineItem::blank()],
            warehouse_id: None,
            is_inter_state: false,
            tax_amt: Decimal::ZERO,
            final_amt: Decimal::ZERO,
        }
    }

    /// Discards the current contents after a successful submission.
    pub fn reset(&self) -> Self {
        Order::new(self.kind)
    }

    // =========================================================================
    // Item Transitions
    // =========================================================================

    /// Applies one field edit to the item at `index` and recomputes.
    ///
    /// Negative quantity/cost edits are clamped to zero on assignment, the
    /// same guard the entry form applies.
    pub fn apply_item_edit(&self, index: usize, edit: ItemEdit) -> CoreResult<Self> {
        let mut next = self.clone();
        let item = next.item_mut(index)?;

        match edit {
            ItemEdit::Name(name) => item.name = name,
            ItemEdit::ItemCode(code) => item.item_code = code,
            ItemEdit::HsnCode(code) => item.hsn_code = code,
            ItemEdit::Units(units) => item.units = units.max(Decimal::ZERO),
            ItemEdit::UnitCost(cost) => item.unit_cost = cost.max(Decimal::ZERO),
            ItemEdit::DiscountPercent(pct) => item.discount_percent = pct,
            ItemEdit::GstPercent(pct) => item.gst_percent = pct,
        }

        Ok(next.recomputed())
    }

    /// Overwrites an item's catalog fields from the tax lookup collaborator.
    ///
    /// The fetched GST percent is authoritative and replaces whatever the
    /// user typed. The user's item label is kept unless it is still blank.
    pub fn apply_catalog_details(&self, index: usize, details: &HsnDetails) -> CoreResult<Self> {
        let mut next = self.clone();
        let item = next.item_mut(index)?;

        item.item_code = details.item_code.clone();
        item.hsn_code = details.hsn_code.clone();
        item.gst_percent = details.gst_per;
        if item.name.trim().is_empty() {
            item.name = details.item_name.clone();
        }

        Ok(next.recomputed())
    }

    /// Appends a blank line item.
    pub fn add_item(&self) -> Self {
        let mut next = self.clone();
        next.items.push(LineItem::blank());
        next.recomputed()
    }

    /// Removes the item at `index`.
    ///
    /// Removing the last remaining item is allowed; the order is then empty
    /// with zero totals.
    pub fn remove_item(&self, index: usize) -> CoreResult<Self> {
        if index >= self.items.len() {
            return Err(CoreError::ItemIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }

        let mut next = self.clone();
        next.items.remove(index);
        Ok(next.recomputed())
    }

    // =========================================================================
    // Header Transitions
    // =========================================================================

    /// Switches the jurisdiction flag and re-splits every item's GST.
    pub fn with_inter_state(&self, inter_state: bool) -> Self {
        let mut next = self.clone();
        next.is_inter_state = inter_state;
        next.recomputed()
    }

    pub fn with_party(&self, party: PartyDetails) -> Self {
        Order {
            party,
            ..self.clone()
        }
    }

    pub fn with_invoice_no(&self, invoice_no: impl Into<String>) -> Self {
        Order {
            invoice_no: invoice_no.into(),
            ..self.clone()
        }
    }

    pub fn with_date(&self, date: Option<NaiveDate>) -> Self {
        Order {
            date,
            ..self.clone()
        }
    }

    pub fn with_warehouse(&self, warehouse_id: Option<String>) -> Self {
        Order {
            warehouse_id,
            ..self.clone()
        }
    }

    // =========================================================================
    // Aggregation
    // =========================================================================

    /// Re-derives every item and re-folds the order totals.
    ///
    /// Pure fold: same items in, same totals out, regardless of how many
    /// times it runs.
    fn recomputed(mut self) -> Self {
        self.items = self
            .items
            .iter()
            .map(|item| derive_item(item, self.is_inter_state))
            .collect();

        self.tax_amt = self.items.iter().map(LineItem::gst_amount).sum();
        self.final_amt = self.items.iter().map(|item| item.total_amount).sum();
        self
    }

    fn item_mut(&mut self, index: usize) -> CoreResult<&mut LineItem> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(CoreError::ItemIndexOutOfRange { index, len })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
