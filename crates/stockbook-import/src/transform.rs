//! # Record Transformer
//!
//! Maps ingested rows into the order's canonical shape: a counterparty block
//! plus a list of line items discovered from repeating column groups.
//!
//! ## Column Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Repeating Item Groups                              │
//! │                                                                         │
//! │  invoiceNo │ supplierName │ item1Name │ item1Units │ item2Name │ ...   │
//! │  ──────────┼──────────────┼───────────┼────────────┼───────────┼─────  │
//! │  PUR-001   │ ABC Ltd      │ Widget    │ 100        │ Bracket   │       │
//! │                                                                         │
//! │  Groups are keyed by an integer index: item{N}Name, item{N}HSN,        │
//! │  item{N}Code, item{N}Units, item{N}UnitCost, item{N}GSTPer,            │
//! │  item{N}Amt. A group exists when its Name column is non-blank.         │
//! │                                                                         │
//! │  Fallback: when NO indexed group exists, the unindexed group           │
//! │  (itemName, itemHSN, ...) is tried once.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Skip Policy
//! - A row missing `invoiceNo` or the counterparty name is noise, not an
//!   error: skipped silently.
//! - A record that resolves zero items is dropped silently.
//!
//! Field values stay loosely typed (`serde_json::Value`) so the schema
//! validator sees exactly what the sheet contained; the fail-soft numeric
//! coercion runs only in [`ImportRecord::to_order`], after validation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use stockbook_core::money::{parse_amount, parse_percent};
use stockbook_core::{Address, LineItem, Order, OrderKind, PartyDetails};

use crate::ingest::ImportRow;
use crate::validate::parse_flexible_date;

// =============================================================================
// Declarative Column-Group Schema
// =============================================================================

/// How a group field defaults when its column is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Missing text defaults to `""`.
    Text,
    /// Missing numerics default to `0`.
    Numeric,
}

impl FieldKind {
    fn default_value(self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::Numeric => Value::Number(0.into()),
        }
    }
}

/// One field inside a repeating column group.
#[derive(Debug, Clone, Copy)]
pub struct GroupField {
    pub suffix: &'static str,
    pub kind: FieldKind,
}

/// A repeating column-group convention: `{prefix}{N}{suffix}` columns, with
/// an unindexed `{prefix}{suffix}` fallback form.
///
/// The convention is data, not code: discovery and extraction are generic
/// over this description.
#[derive(Debug, Clone, Copy)]
pub struct ColumnGroupSchema {
    pub prefix: &'static str,
    /// The suffix whose non-blank value marks a group as present.
    pub name_suffix: &'static str,
    pub fields: &'static [GroupField],
}

/// The line-item column group.
pub const ITEM_GROUP: ColumnGroupSchema = ColumnGroupSchema {
    prefix: "item",
    name_suffix: "Name",
    fields: &[
        GroupField { suffix: "Name", kind: FieldKind::Text },
        GroupField { suffix: "HSN", kind: FieldKind::Text },
        GroupField { suffix: "Code", kind: FieldKind::Text },
        GroupField { suffix: "Units", kind: FieldKind::Numeric },
        GroupField { suffix: "UnitCost", kind: FieldKind::Numeric },
        GroupField { suffix: "GSTPer", kind: FieldKind::Numeric },
        GroupField { suffix: "Amt", kind: FieldKind::Numeric },
    ],
};

impl ColumnGroupSchema {
    /// Discovers the indices with a non-blank `{prefix}{N}{name_suffix}`
    /// cell, in ascending numeric order. Gaps are fine (item1, item3).
    pub fn discover_indices(&self, cells: &Map<String, Value>) -> Vec<u32> {
        let mut indices: Vec<u32> = cells
            .iter()
            .filter(|(_, value)| !is_blank(Some(value)))
            .filter_map(|(key, _)| self.parse_indexed_name_key(key))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Extracts one group instance; `index = None` reads the unindexed form.
    pub fn extract(&self, cells: &Map<String, Value>, index: Option<u32>) -> Map<String, Value> {
        let mut group = Map::new();
        for field in self.fields {
            let key = self.column_name(index, field.suffix);
            let value = cells
                .get(&key)
                .cloned()
                .unwrap_or_else(|| field.kind.default_value());
            group.insert(field.suffix.to_string(), value);
        }
        group
    }

    /// Builds the concrete column name for a field of this group.
    pub fn column_name(&self, index: Option<u32>, suffix: &str) -> String {
        match index {
            Some(i) => format!("{}{}{}", self.prefix, i, suffix),
            None => format!("{}{}", self.prefix, suffix),
        }
    }

    /// `item7Name` → `Some(7)`; anything else → `None`.
    fn parse_indexed_name_key(&self, key: &str) -> Option<u32> {
        let rest = key.strip_prefix(self.prefix)?;
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        let suffix = &rest[digits.len()..];
        if suffix != self.name_suffix {
            return None;
        }
        digits.parse().ok()
    }
}

/// Missing, null, or blank/whitespace text. A numeric cell is never blank.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

// =============================================================================
// Import Record
// =============================================================================

/// Raw counterparty block, exactly as the sheet supplied it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParty {
    pub name: Value,
    pub contact_no: Value,
    pub email: Value,
    pub gst_in: Value,
    pub address_line1: Value,
    pub address_line2: Value,
    pub city: Value,
    pub state: Value,
    pub pincode: Option<Value>,
    pub country: Value,
}

/// Raw line item, one resolved column-group instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub name: Value,
    pub hsn_code: Value,
    pub item_code: Value,
    pub units: Value,
    pub unit_cost: Value,
    pub gst_per: Value,
    pub amt: Value,
}

impl RawItem {
    fn from_group(mut group: Map<String, Value>) -> Self {
        let mut take = |key: &str| group.remove(key).unwrap_or(Value::Null);
        RawItem {
            name: take("Name"),
            hsn_code: take("HSN"),
            item_code: take("Code"),
            units: take("Units"),
            unit_cost: take("UnitCost"),
            gst_per: take("GSTPer"),
            amt: take("Amt"),
        }
    }
}

/// A canonical order-shaped record derived from one spreadsheet row.
///
/// Carries its source row for error reporting and keeps loosely-typed values
/// so validation runs against the sheet's actual content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// 1-based row in the source file this record came from.
    pub source_row: usize,
    pub kind: OrderKind,
    pub party: RawParty,
    pub invoice_no: Value,
    pub date: Option<Value>,
    pub items: Vec<RawItem>,
    pub tax_amt: Option<Value>,
    pub final_amt: Option<Value>,
    pub warehouse_id: Option<Value>,
}

// =============================================================================
// Transformation
// =============================================================================

/// Converts ingested rows into import records, applying the skip policy.
pub fn transform_rows(rows: &[ImportRow], kind: OrderKind) -> Vec<ImportRecord> {
    let records: Vec<ImportRecord> = rows
        .iter()
        .filter_map(|row| transform_row(row, kind))
        .collect();

    debug!(
        rows = rows.len(),
        records = records.len(),
        "Transformed import rows"
    );
    records
}

/// Converts one row into zero or one record.
pub fn transform_row(row: &ImportRow, kind: OrderKind) -> Option<ImportRecord> {
    let prefix = kind.party_prefix();
    let party_name_col = format!("{prefix}Name");

    if is_blank(row.get("invoiceNo")) || is_blank(row.get(&party_name_col)) {
        debug!(row = row.source_row, "Skipping row - missing required fields");
        return None;
    }

    let items = resolve_items(&row.cells);
    if items.is_empty() {
        debug!(row = row.source_row, "Skipping row - no items found");
        return None;
    }

    Some(ImportRecord {
        source_row: row.source_row,
        kind,
        party: extract_party(row, prefix),
        invoice_no: row.get("invoiceNo").cloned().unwrap_or(Value::Null),
        date: row.get("date").cloned(),
        items,
        tax_amt: row.get("taxAmt").cloned(),
        final_amt: row.get("finalAmt").cloned(),
        warehouse_id: row.get("warehouseID").cloned(),
    })
}

/// Resolves the row's line items: indexed groups first, unindexed fallback.
fn resolve_items(cells: &Map<String, Value>) -> Vec<RawItem> {
    let indices = ITEM_GROUP.discover_indices(cells);

    let mut items: Vec<RawItem> = indices
        .into_iter()
        .map(|i| RawItem::from_group(ITEM_GROUP.extract(cells, Some(i))))
        .collect();

    if items.is_empty() {
        let name_col = ITEM_GROUP.column_name(None, ITEM_GROUP.name_suffix);
        if !is_blank(cells.get(&name_col)) {
            items.push(RawItem::from_group(ITEM_GROUP.extract(cells, None)));
        }
    }

    items
}

fn extract_party(row: &ImportRow, prefix: &str) -> RawParty {
    let text = |suffix: &str| {
        row.get(&format!("{prefix}{suffix}"))
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()))
    };

    RawParty {
        name: text("Name"),
        contact_no: text("ContactNo"),
        email: text("Email"),
        gst_in: text("GSTIN"),
        address_line1: text("AddressLine1"),
        address_line2: text("AddressLine2"),
        city: text("City"),
        state: text("State"),
        pincode: row.get(&format!("{prefix}Pincode")).cloned(),
        country: text("Country"),
    }
}

// =============================================================================
// Canonical Conversion
// =============================================================================

impl ImportRecord {
    /// Fail-soft conversion into the canonical [`Order`] for submission.
    ///
    /// Runs AFTER validation: malformed numerics coerce to zero here, and
    /// sheet-supplied amounts (`item{N}Amt`, `taxAmt`, `finalAmt`) are carried
    /// verbatim rather than recomputed - the tax calculator only runs in the
    /// interactive flow.
    pub fn to_order(&self) -> Order {
        let items: Vec<LineItem> = self.items.iter().map(RawItem::to_line_item).collect();

        Order {
            kind: self.kind,
            party: self.party.to_party_details(),
            invoice_no: text_of(&self.invoice_no),
            date: self
                .date
                .as_ref()
                .and_then(|v| v.as_str())
                .and_then(parse_flexible_date),
            items,
            warehouse_id: match &self.warehouse_id {
                Some(v) if !is_blank(Some(v)) => Some(text_of(v)),
                _ => None,
            },
            is_inter_state: false,
            tax_amt: parse_amount(self.tax_amt.as_ref()),
            final_amt: parse_amount(self.final_amt.as_ref()),
        }
    }
}

impl RawItem {
    fn to_line_item(&self) -> LineItem {
        let units = parse_amount(Some(&self.units));
        let unit_cost = parse_amount(Some(&self.unit_cost));

        LineItem {
            name: text_of(&self.name),
            item_code: text_of(&self.item_code),
            hsn_code: text_of(&self.hsn_code),
            units,
            unit_cost,
            discount_percent: Decimal::ZERO,
            gst_percent: parse_percent(Some(&self.gst_per)),
            // The sheet contract carries no discount, so the taxable amount
            // is just the base; the GST split columns do not exist either.
            taxable_amount: units * unit_cost,
            sgst: Decimal::ZERO,
            cgst: Decimal::ZERO,
            igst: Decimal::ZERO,
            total_amount: parse_amount(Some(&self.amt)),
        }
    }
}

impl RawParty {
    fn to_party_details(&self) -> PartyDetails {
        PartyDetails {
            name: text_of(&self.name),
            contact_no: text_of(&self.contact_no),
            email: text_of(&self.email),
            gst_in: text_of(&self.gst_in),
            address: Some(Address {
                line1: text_of(&self.address_line1),
                line2: text_of(&self.address_line2),
                city: text_of(&self.city),
                state: text_of(&self.state),
                pincode: self
                    .pincode
                    .as_ref()
                    .and_then(|v| parse_amount(Some(v)).to_u32())
                    .filter(|p| *p > 0),
                country: text_of(&self.country),
            }),
        }
    }
}

/// Renders a loose value as text: strings as-is, numbers via display,
/// everything else empty.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn row(cells: Value) -> ImportRow {
        let Value::Object(cells) = cells else {
            panic!("test rows must be objects");
        };
        ImportRow {
            source_row: 2,
            cells,
        }
    }

    fn full_row() -> ImportRow {
        row(json!({
            "invoiceNo": "PUR-001",
            "date": "2026-08-01",
            "supplierName": "ABC Suppliers Ltd",
            "supplierContactNo": "1234567890",
            "supplierGSTIN": "22AAAAA0000A1Z5",
            "item1Name": "Raw Material A",
            "item1HSN": "HSN001",
            "item1Code": "RM-A",
            "item1Units": 100,
            "item1UnitCost": 50,
            "item1GSTPer": 18,
            "item1Amt": 5900,
            "taxAmt": 900,
            "finalAmt": 5900,
            "warehouseID": "wh-1"
        }))
    }

    #[test]
    fn test_discover_indices_sorted_with_gaps() {
        let r = row(json!({
            "item3Name": "C",
            "item1Name": "A",
            "item10Name": "J",
            "item2Name": ""
        }));
        assert_eq!(ITEM_GROUP.discover_indices(&r.cells), vec![1, 3, 10]);
    }

    #[test]
    fn test_indexed_key_parsing_rejects_lookalikes() {
        assert_eq!(ITEM_GROUP.parse_indexed_name_key("item1Name"), Some(1));
        assert_eq!(ITEM_GROUP.parse_indexed_name_key("item12Name"), Some(12));
        assert_eq!(ITEM_GROUP.parse_indexed_name_key("itemName"), None);
        assert_eq!(ITEM_GROUP.parse_indexed_name_key("item1Units"), None);
        assert_eq!(ITEM_GROUP.parse_indexed_name_key("itemized1Name"), None);
    }

    #[test]
    fn test_transform_full_row() {
        let record = transform_row(&full_row(), OrderKind::Purchase).unwrap();

        assert_eq!(record.source_row, 2);
        assert_eq!(record.invoice_no, json!("PUR-001"));
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].name, json!("Raw Material A"));
        assert_eq!(record.items[0].units, json!(100));
        assert_eq!(record.tax_amt, Some(json!(900)));
    }

    #[test]
    fn test_missing_invoice_no_skipped_silently() {
        let r = row(json!({
            "supplierName": "ABC Suppliers Ltd",
            "item1Name": "Widget"
        }));
        assert!(transform_row(&r, OrderKind::Purchase).is_none());
    }

    #[test]
    fn test_missing_party_name_skipped_silently() {
        let r = row(json!({
            "invoiceNo": "PUR-001",
            "item1Name": "Widget"
        }));
        assert!(transform_row(&r, OrderKind::Purchase).is_none());
    }

    #[test]
    fn test_blank_invoice_counts_as_missing() {
        let r = row(json!({
            "invoiceNo": "   ",
            "supplierName": "ABC",
            "item1Name": "Widget"
        }));
        assert!(transform_row(&r, OrderKind::Purchase).is_none());
    }

    #[test]
    fn test_zero_items_dropped_silently() {
        let r = row(json!({
            "invoiceNo": "PUR-001",
            "supplierName": "ABC Suppliers Ltd"
        }));
        assert!(transform_row(&r, OrderKind::Purchase).is_none());
    }

    #[test]
    fn test_missing_siblings_are_defaulted() {
        let r = row(json!({
            "invoiceNo": "PUR-001",
            "supplierName": "ABC",
            "item1Name": "Widget"
        }));
        let record = transform_row(&r, OrderKind::Purchase).unwrap();
        let item = &record.items[0];

        assert_eq!(item.hsn_code, json!(""));
        assert_eq!(item.item_code, json!(""));
        assert_eq!(item.units, json!(0));
        assert_eq!(item.unit_cost, json!(0));
        assert_eq!(item.gst_per, json!(0));
        assert_eq!(item.amt, json!(0));
    }

    #[test]
    fn test_generic_fallback_group() {
        let r = row(json!({
            "invoiceNo": "PUR-001",
            "supplierName": "ABC",
            "itemName": "Loose Widget",
            "itemUnits": 5,
            "itemUnitCost": 20
        }));
        let record = transform_row(&r, OrderKind::Purchase).unwrap();

        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].name, json!("Loose Widget"));
        assert_eq!(record.items[0].units, json!(5));
    }

    #[test]
    fn test_indexed_groups_suppress_fallback() {
        let r = row(json!({
            "invoiceNo": "PUR-001",
            "supplierName": "ABC",
            "itemName": "Generic",
            "item1Name": "Indexed"
        }));
        let record = transform_row(&r, OrderKind::Purchase).unwrap();
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].name, json!("Indexed"));
    }

    #[test]
    fn test_sales_kind_reads_customer_columns() {
        let r = row(json!({
            "invoiceNo": "SAL-001",
            "customerName": "Retail Mart",
            "item1Name": "Widget"
        }));
        assert!(transform_row(&r, OrderKind::Purchase).is_none());
        let record = transform_row(&r, OrderKind::Sales).unwrap();
        assert_eq!(record.party.name, json!("Retail Mart"));
    }

    #[test]
    fn test_to_order_fail_soft_coercion() {
        let mut r = full_row();
        r.cells.insert("item1Units".to_string(), json!("garbage"));
        let order = transform_row(&r, OrderKind::Purchase)
            .unwrap()
            .to_order();

        assert_eq!(order.invoice_no, "PUR-001");
        assert_eq!(order.items[0].units, Decimal::ZERO);
        assert_eq!(order.items[0].total_amount, Decimal::from(5900));
        assert_eq!(order.tax_amt, Decimal::from(900));
        assert_eq!(order.final_amt, Decimal::from(5900));
        assert_eq!(
            order.date,
            Some(chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap())
        );
        assert_eq!(order.warehouse_id.as_deref(), Some("wh-1"));
    }

    #[test]
    fn test_to_order_party_block() {
        let order = transform_row(&full_row(), OrderKind::Purchase)
            .unwrap()
            .to_order();

        assert_eq!(order.party.name, "ABC Suppliers Ltd");
        assert_eq!(order.party.contact_no, "1234567890");
        assert_eq!(order.party.gst_in, "22AAAAA0000A1Z5");
    }
}
