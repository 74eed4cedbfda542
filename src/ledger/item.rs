//! Line Item Module
//!
//! Defines products and the cart line items created from them.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LedgerError, Result};

// == Product Id ==
/// Catalogue identifier of a product. Unique within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// == Product ==
/// A catalogue product as handed to the ledger by a product listing.
///
/// Fields the ledger does not interpret (image, category, rating, ...)
/// travel in `extra` and are persisted with the line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units available; 0 means unknown
    #[serde(default)]
    pub stock: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Creates a product with no extra fields.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
            extra: Map::new(),
        }
    }
}

// == Line Item ==
/// One product entry in the cart together with its quantity.
///
/// This is also the persisted record layout:
/// `{id, name, price, quantity, stock, ...extra}`. Missing fields default
/// so that partially written entries still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    /// Unit price
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Never persisted as 0; zero-quantity records are dropped on load
    #[serde(default)]
    pub quantity: u32,
    /// Stock ceiling; 0 means unknown (no ceiling)
    #[serde(default)]
    pub stock: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    // == Constructor ==
    /// Creates a line item for `product` with the given quantity.
    pub fn from_product(product: Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity,
            stock: product.stock,
            extra: product.extra,
        }
    }

    // == Line Total ==
    /// Returns unit price × quantity, or `AmountOverflow` when it does not fit.
    pub fn line_total(&self) -> Result<Decimal> {
        self.price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or(LedgerError::AmountOverflow)
    }

    // == Stock Ceiling ==
    /// Returns the stock ceiling, or None when stock is unknown.
    pub fn stock_limit(&self) -> Option<u32> {
        (self.stock > 0).then_some(self.stock)
    }

    // == At Stock Limit ==
    /// True when no further unit may be added under a clamping policy.
    pub fn at_stock_limit(&self) -> bool {
        self.stock_limit().is_some_and(|limit| self.quantity >= limit)
    }
}
