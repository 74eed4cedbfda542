//! Cart Ledger - A storefront shopping cart
//!
//! Line items persisted to a key-value store, order totals under a fixed
//! pricing policy, simulated checkout and change notifications.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use error::{LedgerError, Result};
pub use ledger::{CartLedger, LineItem, OrderTotals, PricingPolicy, Product, ProductId};
pub use store::{KeyValueStore, MemoryStore};
