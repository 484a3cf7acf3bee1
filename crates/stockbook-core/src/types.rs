//! # Domain Types
//!
//! Core domain types shared across Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │    LineItem     │   │  PartyDetails   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  kind           │   │  units          │   │  name           │       │
//! │  │  invoice_no     │   │  unit_cost      │   │  contact_no     │       │
//! │  │  items          │   │  gst_percent    │   │  email          │       │
//! │  │  tax_amt        │   │  sgst/cgst/igst │   │  gst_in         │       │
//! │  │  final_amt      │   │  total_amount   │   │  address        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Derived LineItem fields are written ONLY by the tax calculator;       │
//! │  everything else is caller-supplied input.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All wire-facing structs serialize camelCase to match the spreadsheet and
//! REST column contract (`invoiceNo`, `taxAmt`, `unitCost`, ...).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Order Kind
// =============================================================================

/// Whether an order is a purchase (supplier-facing) or a sale
/// (customer-facing).
///
/// The kind selects the party-block label on the wire (`supplierDetails` vs
/// `customerDetails`) and the persistence endpoint the order is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Inbound stock from a supplier.
    Purchase,
    /// Outbound stock to a customer.
    Sales,
}

impl OrderKind {
    /// Column prefix for the counterparty block in tabular files
    /// (`supplierName`, `customerName`, ...).
    pub fn party_prefix(&self) -> &'static str {
        match self {
            OrderKind::Purchase => "supplier",
            OrderKind::Sales => "customer",
        }
    }

    /// Wire key for the party block in the canonical order object.
    pub fn party_key(&self) -> &'static str {
        match self {
            OrderKind::Purchase => "supplierDetails",
            OrderKind::Sales => "customerDetails",
        }
    }
}

// =============================================================================
// Party Details
// =============================================================================

/// Postal address block for a counterparty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    /// Indian PIN codes are six digits; absent when the sheet omits it.
    pub pincode: Option<u32>,
    pub country: String,
}

/// The supplier or customer attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PartyDetails {
    pub name: String,
    pub contact_no: String,
    pub email: String,
    /// GST identification number (tax ID).
    #[serde(rename = "gstIN")]
    pub gst_in: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One product/quantity/price entry within an order.
///
/// ## Field Ownership
/// - editable: `name`, `item_code`, `hsn_code`, `units`, `unit_cost`,
///   `discount_percent`, `gst_percent`
/// - derived (tax calculator only): `taxable_amount`, `sgst`, `cgst`,
///   `igst`, `total_amount`
///
/// ## Invariants
/// - `taxable_amount = units * unit_cost * (1 - discount_percent / 100)`
/// - `total_amount = taxable_amount * (1 + gst_percent / 100)`
/// - interstate: `igst = taxable_amount * gst_percent / 100`, `sgst = cgst = 0`
/// - intrastate: `sgst = cgst = taxable_amount * gst_percent / 100 / 2`, `igst = 0`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub item_code: String,
    pub hsn_code: String,
    #[ts(type = "number")]
    pub units: Decimal,
    #[ts(type = "number")]
    pub unit_cost: Decimal,
    #[ts(type = "number")]
    pub discount_percent: Decimal,
    #[ts(type = "number")]
    pub gst_percent: Decimal,
    #[ts(type = "number")]
    pub taxable_amount: Decimal,
    #[ts(type = "number")]
    pub sgst: Decimal,
    #[ts(type = "number")]
    pub cgst: Decimal,
    #[ts(type = "number")]
    pub igst: Decimal,
    #[ts(type = "number")]
    pub total_amount: Decimal,
}

impl LineItem {
    /// A blank line item, as shown in a freshly opened order form.
    pub fn blank() -> Self {
        LineItem::default()
    }

    /// GST carried by this item across all jurisdictional components.
    #[inline]
    pub fn gst_amount(&self) -> Decimal {
        self.sgst + self.cgst + self.igst
    }
}

// =============================================================================
// Tax Lookup Response
// =============================================================================

/// Catalog entry returned by the jurisdictional tax lookup collaborator.
///
/// Field names follow the collaborator's snake_case payload
/// (`item_code`, `hsn_code`, `gst_per`, `item_name`). Once fetched,
/// `gst_per` is authoritative and overwrites any user-entered GST percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HsnDetails {
    pub item_code: String,
    pub hsn_code: String,
    #[ts(type = "number")]
    pub gst_per: Decimal,
    pub item_name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_kind_prefixes() {
        assert_eq!(OrderKind::Purchase.party_prefix(), "supplier");
        assert_eq!(OrderKind::Sales.party_prefix(), "customer");
        assert_eq!(OrderKind::Purchase.party_key(), "supplierDetails");
        assert_eq!(OrderKind::Sales.party_key(), "customerDetails");
    }

    #[test]
    fn test_blank_line_item_is_zeroed() {
        let item = LineItem::blank();
        assert_eq!(item.units, Decimal::ZERO);
        assert_eq!(item.total_amount, Decimal::ZERO);
        assert!(item.name.is_empty());
    }

    #[test]
    fn test_line_item_serializes_camel_case() {
        let item = LineItem::blank();
        let value = serde_json::to_value(&item).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("itemCode"));
        assert!(obj.contains_key("hsnCode"));
        assert!(obj.contains_key("unitCost"));
        assert!(obj.contains_key("discountPercent"));
        assert!(obj.contains_key("gstPercent"));
        assert!(obj.contains_key("taxableAmount"));
        assert!(obj.contains_key("totalAmount"));
    }

    #[test]
    fn test_party_details_gst_in_key() {
        let party = PartyDetails {
            name: "ABC Suppliers Ltd".to_string(),
            gst_in: "22AAAAA0000A1Z5".to_string(),
            ..PartyDetails::default()
        };
        let value = serde_json::to_value(&party).unwrap();
        assert_eq!(value["gstIN"], "22AAAAA0000A1Z5");
    }
}
