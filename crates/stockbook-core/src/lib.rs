//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the **heart** of Stockbook. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockbook Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Back-Office UI (external)                       │   │
//! │  │    Order drawers ──► Import drawer ──► Dashboards              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockbook-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │    tax    │  │   order   │  │   │
//! │  │   │ LineItem  │  │ parse/pct │  │ GST split │  │ Order     │  │   │
//! │  │   │ PartyDtls │  │ rounding  │  │ discount  │  │ fold      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │   stockbook-import (pipeline)    stockbook-api (collaborators)  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order kind, LineItem, party details)
//! - [`money`] - Fail-soft decimal coercion and percentage arithmetic
//! - [`tax`] - Line-item GST calculator
//! - [`order`] - Immutable order value, pure transitions, aggregation fold
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system and spreadsheet access are FORBIDDEN here
//! 3. **Decimal Money**: Full-precision `rust_decimal` values; rounding only at
//!    the presentation boundary
//! 4. **Fail-Soft Coercion**: Malformed numeric input becomes zero; the schema
//!    validator (downstream) is where hard failures are reported

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod tax;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockbook_core::Order` instead of
// `use stockbook_core::order::Order`

pub use error::{CoreError, CoreResult};
pub use order::{ItemEdit, Order};
pub use tax::{compute_line, GstBreakdown};
pub use types::{Address, HsnDetails, LineItem, OrderKind, PartyDetails};
