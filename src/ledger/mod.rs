//! Ledger Module
//!
//! Cart line items, order totals, change notifications and the ledger
//! that ties them to a key-value store.

mod cart;
mod events;
mod item;
mod totals;


// Re-export public types
pub use cart::{CartLedger, CartState, OrderConfirmation, StockPolicy};
pub use events::{CartEvents, Subscription};
pub use item::{LineItem, Product, ProductId};
pub use totals::{compute_totals, OrderTotals, PricingPolicy, MINOR_UNIT_DP};
