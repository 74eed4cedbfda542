//! Configuration Module
//!
//! Handles loading and managing ledger and server configuration from environment variables.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::ledger::{PricingPolicy, StockPolicy};

/// Default key of the persisted cart entry.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Default base URL of the external auth service.
pub const DEFAULT_AUTH_API_URL: &str = "http://localhost:8080/api";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Key under which the cart is persisted in the key-value store
    pub cart_key: String,
    /// Shipping threshold, fee and tax rate
    pub pricing: PricingPolicy,
    /// Whether quantities are clamped to the product stock
    pub stock_policy: StockPolicy,
    /// Base URL of the auth service (register/login)
    pub auth_api_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CART_STORAGE_KEY` - Persisted cart entry name (default: "cart")
    /// - `FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 1000)
    /// - `FLAT_SHIPPING_FEE` - Shipping fee below the threshold (default: 50)
    /// - `TAX_RATE` - Tax rate applied to the subtotal (default: 0.18)
    /// - `STOCK_POLICY` - `clamp` or `unchecked` (default: clamp)
    /// - `AUTH_API_URL` - Auth service base URL (default: http://localhost:8080/api)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cart_key: env::var("CART_STORAGE_KEY")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.cart_key),
            pricing: PricingPolicy {
                free_shipping_threshold: parse_var::<Decimal>("FREE_SHIPPING_THRESHOLD")
                    .unwrap_or(defaults.pricing.free_shipping_threshold),
                flat_shipping_fee: parse_var::<Decimal>("FLAT_SHIPPING_FEE")
                    .unwrap_or(defaults.pricing.flat_shipping_fee),
                tax_rate: parse_var::<Decimal>("TAX_RATE").unwrap_or(defaults.pricing.tax_rate),
            },
            stock_policy: parse_var("STOCK_POLICY").unwrap_or(defaults.stock_policy),
            auth_api_url: env::var("AUTH_API_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.auth_api_url),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cart_key: DEFAULT_CART_KEY.to_string(),
            pricing: PricingPolicy::default(),
            stock_policy: StockPolicy::default(),
            auth_api_url: DEFAULT_AUTH_API_URL.to_string(),
        }
    }
}
