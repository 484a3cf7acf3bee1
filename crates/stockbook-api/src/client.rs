//! # Back-Office REST Client
//!
//! Implementations of the two external collaborators the core depends on:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    External Collaborators                               │
//! │                                                                         │
//! │  OrderSubmitter                                                         │
//! │    POST {base}/api/purchase/add-purchase   (purchase orders)           │
//! │    POST {base}/api/sales/add-sales         (sales orders)              │
//! │    One canonical order object per call. Opaque unary operation:        │
//! │    no batching, no retry, no caller-visible timeout.                   │
//! │                                                                         │
//! │  CatalogLookup                                                          │
//! │    GET  {base}/hsn/hsnAdd/{itemCode}                                   │
//! │    → { item_code, hsn_code, gst_per, item_name }                       │
//! │    gst_per is authoritative once fetched.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use stockbook_core::{HsnDetails, Order, OrderKind};

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Collaborator Traits
// =============================================================================

/// The persistence collaborator: accepts one canonical order per call.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submits a single order; success or failure, nothing in between.
    async fn submit_order(&self, order: &Order) -> ApiResult<()>;
}

/// The jurisdictional tax lookup collaborator.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Resolves an item code to its catalog entry (HSN code, GST percent).
    async fn hsn_details(&self, item_code: &str) -> ApiResult<HsnDetails>;
}

// =============================================================================
// Wire Payload
// =============================================================================

/// Builds the canonical order object the persistence endpoint expects.
///
/// The party block is keyed by order kind (`supplierDetails` for purchases,
/// `customerDetails` for sales); the kind discriminant itself is not part of
/// the wire shape - the endpoint already implies it.
pub fn order_payload(order: &Order) -> ApiResult<Value> {
    let mut value =
        serde_json::to_value(order).map_err(|e| ApiError::Encode(e.to_string()))?;

    if let Value::Object(map) = &mut value {
        map.remove("kind");
        if let Some(party) = map.remove("party") {
            map.insert(order.kind.party_key().to_string(), party);
        }
    }

    Ok(value)
}

// =============================================================================
// HTTP Client
// =============================================================================

/// HTTP client for the back-office REST API.
#[derive(Debug, Clone)]
pub struct BackofficeClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackofficeClient {
    /// Creates a client for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        BackofficeClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn submit_path(kind: OrderKind) -> &'static str {
        match kind {
            OrderKind::Purchase => "api/purchase/add-purchase",
            OrderKind::Sales => "api/sales/add-sales",
        }
    }
}

#[async_trait]
impl OrderSubmitter for BackofficeClient {
    async fn submit_order(&self, order: &Order) -> ApiResult<()> {
        let url = self.endpoint(Self::submit_path(order.kind));
        let payload = order_payload(order)?;

        debug!(invoice = %order.invoice_no, %url, "Submitting order");

        let response = self.http.post(&url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: detail.chars().take(200).collect(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl CatalogLookup for BackofficeClient {
    async fn hsn_details(&self, item_code: &str) -> ApiResult<HsnDetails> {
        let url = self.endpoint(&format!("hsn/hsnAdd/{item_code}"));

        debug!(%item_code, %url, "Fetching catalog details");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: format!("item {item_code} not found"),
            });
        }

        response
            .json::<HsnDetails>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use stockbook_core::ItemEdit;

    fn sample_order(kind: OrderKind) -> Order {
        Order::new(kind)
            .with_invoice_no("PUR-001")
            .apply_item_edit(0, ItemEdit::Units(Decimal::from(100)))
            .unwrap()
            .apply_item_edit(0, ItemEdit::UnitCost(Decimal::from(50)))
            .unwrap()
            .apply_item_edit(0, ItemEdit::GstPercent(Decimal::from(18)))
            .unwrap()
    }

    #[test]
    fn test_purchase_payload_uses_supplier_block() {
        let payload = order_payload(&sample_order(OrderKind::Purchase)).unwrap();
        let obj = payload.as_object().unwrap();

        assert!(obj.contains_key("supplierDetails"));
        assert!(!obj.contains_key("customerDetails"));
        assert!(!obj.contains_key("party"));
        assert!(!obj.contains_key("kind"));
        assert_eq!(payload["invoiceNo"], "PUR-001");
    }

    #[test]
    fn test_sales_payload_uses_customer_block() {
        let payload = order_payload(&sample_order(OrderKind::Sales)).unwrap();
        assert!(payload.as_object().unwrap().contains_key("customerDetails"));
    }

    #[test]
    fn test_endpoint_join_handles_trailing_slash() {
        let client = BackofficeClient::new("http://localhost:5000/");
        assert_eq!(
            client.endpoint("api/purchase/add-purchase"),
            "http://localhost:5000/api/purchase/add-purchase"
        );
        assert_eq!(
            client.endpoint("/hsn/hsnAdd/RM-A"),
            "http://localhost:5000/hsn/hsnAdd/RM-A"
        );
    }

    #[test]
    fn test_hsn_details_decodes_collaborator_payload() {
        let details: HsnDetails = serde_json::from_value(serde_json::json!({
            "item_code": "RM-A",
            "hsn_code": "HSN001",
            "gst_per": 18,
            "item_name": "Raw Material A"
        }))
        .unwrap();

        assert_eq!(details.gst_per, Decimal::from(18));
        assert_eq!(details.hsn_code, "HSN001");
    }
}
