//! Order Totals Module
//!
//! Pricing policy and the pure order-total calculation.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::{LedgerError, Result};
use crate::ledger::LineItem;

/// Decimal places of the minor currency unit (paise/cents).
pub const MINOR_UNIT_DP: u32 = 2;

// == Pricing Policy ==
/// Fixed pricing rules applied to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Subtotal strictly above which shipping is waived
    pub free_shipping_threshold: Decimal,
    /// Shipping fee charged at or below the threshold
    pub flat_shipping_fee: Decimal,
    /// Tax rate applied to the subtotal (0.18 = 18%)
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::from(1000),
            flat_shipping_fee: Decimal::from(50),
            tax_rate: Decimal::new(18, 2),
        }
    }
}

impl PricingPolicy {
    // == Shipping Fee ==
    /// Shipping for a given subtotal: free for an empty cart or above the threshold.
    pub fn shipping_fee(&self, subtotal: Decimal) -> Decimal {
        if subtotal.is_zero() || subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    // == Free Shipping Hint ==
    /// Amount still needed before shipping becomes free.
    ///
    /// Only reported while `0 < subtotal < threshold`.
    pub fn amount_until_free_shipping(&self, subtotal: Decimal) -> Option<Decimal> {
        (subtotal > Decimal::ZERO && subtotal < self.free_shipping_threshold)
            .then(|| self.free_shipping_threshold - subtotal)
    }
}

// == Order Totals ==
/// Totals derived from a cart. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    // == Rounded ==
    /// Returns a copy with every component rounded to minor currency units.
    ///
    /// The ledger itself never rounds; this is for display.
    pub fn rounded(&self) -> Self {
        let round = |value: Decimal| {
            value.round_dp_with_strategy(MINOR_UNIT_DP, RoundingStrategy::MidpointAwayFromZero)
        };
        Self {
            subtotal: round(self.subtotal),
            shipping: round(self.shipping),
            tax: round(self.tax),
            total: round(self.total),
        }
    }

    // == Is Free Shipping ==
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

// == Compute Totals ==
/// Derives order totals for `items` under `policy`.
///
/// Pure: the same input always yields the same totals. No component is
/// rounded, so `total == subtotal + shipping + tax` holds exactly.
///
/// Returns `AmountOverflow` when any amount leaves the decimal range.
pub fn compute_totals(items: &[LineItem], policy: &PricingPolicy) -> Result<OrderTotals> {
    let subtotal = items.iter().try_fold(Decimal::ZERO, |sum, item| {
        sum.checked_add(item.line_total()?)
            .ok_or(LedgerError::AmountOverflow)
    })?;
    let shipping = policy.shipping_fee(subtotal);
    let tax = subtotal
        .checked_mul(policy.tax_rate)
        .ok_or(LedgerError::AmountOverflow)?;
    let total = subtotal
        .checked_add(shipping)
        .and_then(|sum| sum.checked_add(tax))
        .ok_or(LedgerError::AmountOverflow)?;

    Ok(OrderTotals {
        subtotal,
        shipping,
        tax,
        total,
    })
}
