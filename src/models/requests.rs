//! Request DTOs for the cart API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::ledger::Product;

fn one() -> u32 {
    1
}

/// Request body for adding to the cart (POST /cart/items)
///
/// # Fields
/// - `product`: The catalogue product; unknown fields are kept with the line
/// - `quantity`: Units to add (defaults to 1)
#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub product: Product,
    #[serde(default = "one")]
    pub quantity: u32,
}

impl AddItemRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.product.name.trim().is_empty() {
            return Some("Product name cannot be empty".to_string());
        }
        if self.product.price.is_sign_negative() {
            return Some("Product price cannot be negative".to_string());
        }
        None
    }
}

/// Request body for changing a line's quantity (PATCH /cart/items/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}
