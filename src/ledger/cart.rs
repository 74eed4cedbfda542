//! Cart Ledger Module
//!
//! The authoritative cart: line items persisted to a key-value store,
//! with totals, checkout and change notifications.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::Session;
use crate::config::{Config, DEFAULT_CART_KEY};
use crate::error::{LedgerError, Result};
use crate::ledger::{
    compute_totals, CartEvents, LineItem, OrderTotals, PricingPolicy, Product, ProductId,
    Subscription,
};
use crate::store::KeyValueStore;

// == Stock Policy ==
/// How the ledger treats a product's stock ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockPolicy {
    /// Quantities are clamped to `stock` whenever `stock > 0`
    #[default]
    Clamp,
    /// Quantities are stored as requested; any ceiling is a UI concern
    Unchecked,
}

impl StockPolicy {
    fn apply(self, quantity: u32, stock: u32) -> u32 {
        match self {
            StockPolicy::Clamp if stock > 0 => quantity.min(stock),
            _ => quantity,
        }
    }
}

impl FromStr for StockPolicy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "clamp" => Ok(StockPolicy::Clamp),
            "unchecked" => Ok(StockPolicy::Unchecked),
            other => Err(LedgerError::InvalidRequest(format!(
                "unknown stock policy '{other}'"
            ))),
        }
    }
}

// == Cart State ==
/// The two states of a cart. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    Empty,
    NonEmpty,
}

impl fmt::Display for CartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartState::Empty => write!(f, "empty"),
            CartState::NonEmpty => write!(f, "non-empty"),
        }
    }
}

// == Order Confirmation ==
/// Synthetic confirmation of a simulated purchase. Nothing is recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub confirmation_id: Uuid,
    pub placed_at: DateTime<Utc>,
    /// Sum of quantities at checkout
    pub item_count: u64,
    pub totals: OrderTotals,
}

// == Cart Ledger ==
/// Maintains the cart in a key-value store.
///
/// Every read goes to the store, so several ledgers over a shared store
/// observe each other's writes (last write wins).
pub struct CartLedger<S> {
    store: S,
    key: String,
    pricing: PricingPolicy,
    stock_policy: StockPolicy,
    events: CartEvents,
}

impl<S: KeyValueStore> CartLedger<S> {
    // == Constructor ==
    /// Creates a ledger with the default key, pricing and stock policy.
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_CART_KEY.to_string(),
            pricing: PricingPolicy::default(),
            stock_policy: StockPolicy::default(),
            events: CartEvents::new(),
        }
    }

    /// Creates a ledger configured from `config`.
    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store)
            .with_key(config.cart_key.clone())
            .with_pricing(config.pricing.clone())
            .with_stock_policy(config.stock_policy)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_pricing(mut self, pricing: PricingPolicy) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_stock_policy(mut self, stock_policy: StockPolicy) -> Self {
        self.stock_policy = stock_policy;
        self
    }

    // == Accessors ==
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }

    pub fn events(&self) -> &CartEvents {
        &self.events
    }

    // == Subscribe ==
    /// Registers a cart-changed observer. See [`CartEvents::subscribe`].
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    // == Items ==
    /// Loads the persisted cart.
    ///
    /// A missing entry, or one that is not a JSON array, reads as an empty
    /// cart. Records that fail to parse and records with quantity 0 are
    /// dropped; the remaining lines are kept.
    pub fn items(&self) -> Vec<LineItem> {
        let Some(raw) = self.store.get(&self.key) else {
            return Vec::new();
        };

        let records = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding unreadable cart entry");
                return Vec::new();
            }
        };

        records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<LineItem>(record) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!(key = %self.key, error = %err, "discarding unreadable cart line");
                    None
                }
            })
            .filter(|item| item.quantity > 0)
            .collect()
    }

    // == Item Count ==
    /// Sum of quantities, as shown on a cart badge.
    pub fn item_count(&self) -> u64 {
        self.items().iter().map(|item| u64::from(item.quantity)).sum()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    // == State ==
    pub fn state(&self) -> CartState {
        if self.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }

    // == Totals ==
    /// Totals of the persisted cart under this ledger's pricing.
    pub fn totals(&self) -> Result<OrderTotals> {
        compute_totals(&self.items(), &self.pricing)
    }

    // == Add Item ==
    /// Adds `quantity` units of `product`.
    ///
    /// An existing line for the same product is incremented rather than
    /// duplicated. A quantity of 0 changes nothing. Fails with
    /// `AmountOverflow`, leaving the cart unchanged, when the resulting
    /// totals would leave the decimal range.
    pub fn add_item(&mut self, product: Product, quantity: u32) -> Result<()> {
        if quantity == 0 {
            debug!(product = %product.id, "ignoring add of zero units");
            return Ok(());
        }

        let mut items = self.items();
        let policy = self.stock_policy;

        match items.iter().position(|item| item.id == product.id) {
            Some(index) => {
                let item = &mut items[index];
                item.quantity = policy.apply(item.quantity.saturating_add(quantity), item.stock);
                info!(product = %item.id, quantity = item.quantity, "cart line incremented");
            }
            None => {
                let stock = product.stock;
                let item = LineItem::from_product(product, policy.apply(quantity, stock));
                info!(product = %item.id, quantity = item.quantity, "cart line added");
                items.push(item);
            }
        }

        self.ensure_in_range(&items)?;
        self.commit(&items)
    }

    // == Update Quantity ==
    /// Replaces the quantity of the line for `id`.
    ///
    /// Quantities below 1 are ignored; removal goes through [`remove_item`](Self::remove_item).
    /// Like [`add_item`](Self::add_item), refuses quantities whose totals overflow.
    pub fn update_quantity(&mut self, id: ProductId, new_quantity: u32) -> Result<()> {
        if new_quantity < 1 {
            debug!(product = %id, "ignoring update to zero units");
            return Ok(());
        }

        let mut items = self.items();
        let policy = self.stock_policy;

        for item in items.iter_mut().filter(|item| item.id == id) {
            item.quantity = policy.apply(new_quantity, item.stock);
            info!(product = %id, quantity = item.quantity, "cart line updated");
        }

        self.ensure_in_range(&items)?;
        self.commit(&items)
    }

    // == Remove Item ==
    /// Removes the line for `id`. Removing an absent product still
    /// persists and notifies.
    pub fn remove_item(&mut self, id: ProductId) -> Result<()> {
        let mut items = self.items();
        let before = items.len();
        items.retain(|item| item.id != id);

        if items.len() < before {
            info!(product = %id, "cart line removed");
        } else {
            debug!(product = %id, "remove of absent cart line");
        }

        self.commit(&items)
    }

    // == Clear ==
    /// Empties the cart without checking out.
    pub fn clear(&mut self) {
        self.store.remove(&self.key);
        info!("cart cleared");
        self.events.notify();
    }

    // == Checkout ==
    /// Simulates a purchase of the current cart.
    ///
    /// Requires a session and a non-empty cart; either failure leaves the
    /// cart untouched. On success the persisted entry is removed.
    pub fn checkout(&mut self, session: Option<&Session>) -> Result<OrderConfirmation> {
        let Some(session) = session else {
            warn!("checkout rejected: no authenticated session");
            return Err(LedgerError::Unauthenticated);
        };

        let items = self.items();
        if items.is_empty() {
            warn!(user = %session.user.email, "checkout rejected: cart is empty");
            return Err(LedgerError::EmptyCart);
        }

        let confirmation = OrderConfirmation {
            confirmation_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            item_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
            totals: compute_totals(&items, &self.pricing)?,
        };

        self.store.remove(&self.key);
        info!(
            confirmation = %confirmation.confirmation_id,
            user = %session.user.email,
            items = confirmation.item_count,
            total = %confirmation.totals.total,
            "order placed"
        );
        self.events.notify();

        Ok(confirmation)
    }

    // == Range Check ==
    fn ensure_in_range(&self, items: &[LineItem]) -> Result<()> {
        if let Err(err) = compute_totals(items, &self.pricing) {
            warn!(key = %self.key, "rejecting cart change: amount out of range");
            return Err(err);
        }
        Ok(())
    }

    // == Commit ==
    fn commit(&self, items: &[LineItem]) -> Result<()> {
        let encoded =
            serde_json::to_string(items).map_err(|e| LedgerError::Internal(e.to_string()))?;
        self.store.set(&self.key, encoded);
        self.events.notify();
        Ok(())
    }
}

impl<S> fmt::Debug for CartLedger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartLedger")
            .field("key", &self.key)
            .field("pricing", &self.pricing)
            .field("stock_policy", &self.stock_policy)
            .field("events", &self.events)
            .finish()
    }
}
