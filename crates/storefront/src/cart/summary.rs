//! Order summary shown beside the cart: subtotal, shipping, tax and total.

use menen_core::{Price, round_cents};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::state::CartState;

/// Shipping and tax rules applied to a cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Sales tax rate as a fraction (0.08 = 8%).
    pub tax_rate: Decimal,
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Decimal,
    /// Shipping charged at or below the threshold.
    pub flat_shipping: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            free_shipping_threshold: Decimal::ONE_HUNDRED,
            flat_shipping: Decimal::new(999, 2),
        }
    }
}

impl PricingPolicy {
    /// Shipping owed on `subtotal`. An empty cart ships nothing.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal.is_zero() || subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping
        }
    }

    /// Tax owed on `subtotal`, rounded to cents.
    #[must_use]
    pub fn tax_for(&self, subtotal: Decimal) -> Decimal {
        round_cents(subtotal.saturating_mul(self.tax_rate))
    }
}

/// Totals for a cart under a [`PricingPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// How much more must be spent to ship free; zero once qualified.
    pub free_shipping_remaining: Decimal,
    /// Progress towards free shipping, 0 to 100.
    pub free_shipping_progress: u8,
}

impl OrderSummary {
    /// Summarise `cart` using the policy's flat-rate shipping.
    #[must_use]
    pub fn calculate(cart: &CartState, policy: &PricingPolicy) -> Self {
        let shipping = policy.shipping_for(cart.total());
        Self::with_shipping(cart, policy, shipping)
    }

    /// Summarise `cart` with an explicit shipping charge.
    #[must_use]
    pub fn with_shipping(cart: &CartState, policy: &PricingPolicy, shipping: Decimal) -> Self {
        let subtotal = cart.total();
        let tax = policy.tax_for(subtotal);
        let total = subtotal.saturating_add(shipping).saturating_add(tax);

        let threshold = policy.free_shipping_threshold;
        let free_shipping_remaining = threshold.saturating_sub(subtotal).max(Decimal::ZERO);

        Self {
            subtotal,
            shipping,
            tax,
            total,
            free_shipping_remaining,
            free_shipping_progress: free_shipping_progress(subtotal, threshold),
        }
    }

    /// Whether shipping is free.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Each figure as a display price, in presentation order.
    #[must_use]
    pub fn lines(&self) -> [(&'static str, Price); 4] {
        [
            ("Subtotal", Price::usd(self.subtotal)),
            ("Shipping", Price::usd(self.shipping)),
            ("Tax", Price::usd(self.tax)),
            ("Total", Price::usd(self.total)),
        ]
    }
}

/// Percentage of `threshold` reached by `subtotal`, capped at 100.
///
/// A ratio too large to represent counts as fully qualified.
fn free_shipping_progress(subtotal: Decimal, threshold: Decimal) -> u8 {
    if threshold <= Decimal::ZERO {
        return 100;
    }
    subtotal
        .checked_div(threshold)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(100, |percent| {
            percent
                .min(Decimal::ONE_HUNDRED)
                .floor()
                .to_u8()
                .unwrap_or(0)
        })
}
