//! Response DTOs for the cart API
//!
//! Defines the structure of outgoing HTTP response bodies. Money is
//! serialized as decimal strings.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::auth::User;
use crate::ledger::{CartState, LineItem, OrderConfirmation, OrderTotals, PricingPolicy};

/// Totals with their display rounding and the free-shipping hint
#[derive(Debug, Clone, Serialize)]
pub struct TotalsResponse {
    /// Exact totals as computed by the ledger
    #[serde(flatten)]
    pub exact: OrderTotals,
    /// Totals rounded to minor currency units
    pub display: OrderTotals,
    pub free_shipping: bool,
    /// Amount to add before shipping becomes free
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_until_free_shipping: Option<Decimal>,
}

impl TotalsResponse {
    pub fn new(totals: OrderTotals, policy: &PricingPolicy) -> Self {
        Self {
            exact: totals,
            display: totals.rounded(),
            free_shipping: totals.is_free_shipping(),
            amount_until_free_shipping: policy.amount_until_free_shipping(totals.subtotal),
        }
    }
}

/// Response body for GET /cart and the cart mutations
#[derive(Debug, Clone, Serialize)]
pub struct CartResponse {
    pub state: CartState,
    pub items: Vec<LineItem>,
    pub item_count: u64,
    pub totals: TotalsResponse,
}

/// Response body for GET /cart/count
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Response body for POST /cart/checkout
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub message: String,
    #[serde(flatten)]
    pub confirmation: OrderConfirmation,
}

impl CheckoutResponse {
    pub fn new(confirmation: OrderConfirmation) -> Self {
        Self {
            message: "Order placed successfully".to_string(),
            confirmation,
        }
    }
}

/// Response body for PUT /session
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
