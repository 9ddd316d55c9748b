//! Order request payload and the shipping/payment options offered at checkout.

use menen_core::CraftId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CheckoutError;
use crate::cart::{CartState, OrderSummary, PricingPolicy};

/// Delivery speed chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    NextDay,
}

impl ShippingMethod {
    /// Every method, in display order.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Express, Self::NextDay];

    /// Flat charge for the method.
    #[must_use]
    pub const fn cost(&self) -> Decimal {
        match self {
            Self::Standard => Decimal::from_parts(999, 0, 0, false, 2),
            Self::Express => Decimal::from_parts(1999, 0, 0, false, 2),
            Self::NextDay => Decimal::from_parts(2999, 0, 0, false, 2),
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard Shipping (5-7 days)",
            Self::Express => "Express Shipping (2-3 days)",
            Self::NextDay => "Next Day Delivery",
        }
    }

    /// Totals for `cart` when shipped with this method.
    #[must_use]
    pub fn quote(&self, cart: &CartState, policy: &PricingPolicy) -> OrderSummary {
        OrderSummary::with_shipping(cart, policy, self.cost())
    }
}

impl std::fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Express => write!(f, "express"),
            Self::NextDay => write!(f, "nextday"),
        }
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "nextday" | "next-day" => Ok(Self::NextDay),
            _ => Err(format!("invalid shipping method: {s}")),
        }
    }
}

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
    Apple,
    Google,
}

impl PaymentMethod {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Card => "Credit/Debit Card",
            Self::Paypal => "PayPal",
            Self::Apple => "Apple Pay",
            Self::Google => "Google Pay",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Paypal => write!(f, "paypal"),
            Self::Apple => write!(f, "apple"),
            Self::Google => write!(f, "google"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "apple" => Ok(Self::Apple),
            "google" => Ok(Self::Google),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// One line of an order: the backend re-prices from the craft id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub craft_id: CraftId,
    pub quantity: u32,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub shipping_method: ShippingMethod,
    pub payment_method: PaymentMethod,
}

impl OrderRequest {
    /// Build an order from the cart contents.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    pub fn from_cart(
        cart: &CartState,
        shipping_method: ShippingMethod,
        payment_method: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let items = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                craft_id: item.id().clone(),
                quantity: item.quantity(),
            })
            .collect();

        Ok(Self {
            items,
            shipping_method,
            payment_method,
        })
    }
}
