//! Cart line items.

use std::num::NonZeroU32;

use menen_core::{CraftId, Price, round_cents};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a line item cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineItemError {
    /// Unit price below zero.
    #[error("unit price must not be negative (got {0})")]
    NegativePrice(Decimal),

    /// Unit price above [`MAX_UNIT_PRICE`].
    #[error("unit price {0} exceeds the maximum of 9999999999999.99")]
    PriceOutOfRange(Decimal),

    /// Quantity of zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// Largest accepted unit price, 9 999 999 999 999.99.
///
/// Prices are persisted as JSON numbers; with at most 15 significant digits a
/// cent amount reads back from its `f64` form unchanged.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// One product entry in the cart with its quantity and cached price.
///
/// The unit price is captured when the item is added and never re-priced.
/// Serialized field names follow the persisted cart format (`unitPrice`,
/// `artisanLabel`); the older `price` and `artisan` names are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    id: CraftId,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Primary image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Artisan display name.
    #[serde(default, alias = "artisan")]
    pub artisan_label: String,
    #[serde(alias = "price", with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    quantity: NonZeroU32,
}

impl LineItem {
    /// Create a line item. The unit price is rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `LineItemError` if `unit_price` is negative or above
    /// [`MAX_UNIT_PRICE`], or `quantity` is zero.
    pub fn new(
        id: impl Into<CraftId>,
        title: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Self, LineItemError> {
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(LineItemError::NegativePrice(unit_price));
        }
        let unit_price = round_cents(unit_price);
        if unit_price > MAX_UNIT_PRICE {
            return Err(LineItemError::PriceOutOfRange(unit_price));
        }
        let quantity = NonZeroU32::new(quantity).ok_or(LineItemError::ZeroQuantity)?;

        Ok(Self {
            id: id.into(),
            title: title.into(),
            image: None,
            artisan_label: String::new(),
            unit_price,
            quantity,
        })
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the artisan display name.
    #[must_use]
    pub fn with_artisan(mut self, artisan_label: impl Into<String>) -> Self {
        self.artisan_label = artisan_label.into();
        self
    }

    /// Product identifier; unique within a cart.
    #[must_use]
    pub const fn id(&self) -> &CraftId {
        &self.id
    }

    /// Price of a single unit.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Number of units.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .saturating_mul(Decimal::from(self.quantity.get()))
    }

    /// Unit price as a display price.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::usd(self.unit_price)
    }

    pub(crate) fn has_valid_price(&self) -> bool {
        (!self.unit_price.is_sign_negative() || self.unit_price.is_zero())
            && self.unit_price <= MAX_UNIT_PRICE
    }

    pub(crate) const fn set_quantity(&mut self, quantity: NonZeroU32) {
        self.quantity = quantity;
    }

    pub(crate) const fn add_quantity(&mut self, extra: NonZeroU32) {
        self.quantity = self.quantity.saturating_add(extra.get());
    }

    pub(crate) const fn quantity_nonzero(&self) -> NonZeroU32 {
        self.quantity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_quantity() {
        let err = LineItem::new("a", "Mug", Decimal::TEN, 0).unwrap_err();
        assert_eq!(err, LineItemError::ZeroQuantity);
    }

    #[test]
    fn test_new_rejects_negative_price() {
        let err = LineItem::new("a", "Mug", Decimal::NEGATIVE_ONE, 1).unwrap_err();
        assert!(matches!(err, LineItemError::NegativePrice(_)));
    }

    #[test]
    fn test_new_rounds_to_cents() {
        let item = LineItem::new("a", "Bead", Decimal::new(123_456_789, 7), 1).unwrap();
        assert_eq!(item.unit_price(), Decimal::new(1235, 2));
    }

    #[test]
    fn test_new_rejects_prices_beyond_max() {
        let too_precise: Decimal = "12345678901234567.89".parse().unwrap();
        for price in [too_precise, Decimal::MAX, MAX_UNIT_PRICE + Decimal::new(1, 2)] {
            let err = LineItem::new("a", "Mural", price, 1).unwrap_err();
            assert!(matches!(err, LineItemError::PriceOutOfRange(_)), "{price}");
        }
        assert!(LineItem::new("a", "Mural", MAX_UNIT_PRICE, 1).is_ok());
    }

    #[test]
    fn test_new_accepts_free_item() {
        let item = LineItem::new("a", "Sticker", Decimal::ZERO, 3).unwrap();
        assert_eq!(item.line_total(), Decimal::ZERO);
    }

    #[test]
    fn test_line_total() {
        let item = LineItem::new("a", "Mug", Decimal::new(1250, 2), 3).unwrap();
        assert_eq!(item.line_total(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_serializes_camel_case_with_numeric_price() {
        let item = LineItem::new("a", "Mug", Decimal::new(999, 2), 2)
            .unwrap()
            .with_artisan("Amina K.");
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["id"], "a");
        assert!((json["unitPrice"].as_f64().unwrap() - 9.99).abs() < 1e-9);
        assert_eq!(json["artisanLabel"], "Amina K.");
        assert_eq!(json["quantity"], 2);
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_deserializes_legacy_field_names() {
        let json = r#"{"id":7,"title":"Basket","price":24.5,"quantity":1,"image":"/b.jpg","artisan":"Sara T"}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.id().as_str(), "7");
        assert_eq!(item.unit_price(), Decimal::new(245, 1));
        assert_eq!(item.artisan_label, "Sara T");
        assert_eq!(item.image.as_deref(), Some("/b.jpg"));
    }

    #[test]
    fn test_deserialize_rejects_zero_quantity() {
        let json = r#"{"id":"a","title":"Mug","unitPrice":5,"quantity":0}"#;
        assert!(serde_json::from_str::<LineItem>(json).is_err());
    }

    #[test]
    fn test_add_quantity_saturates() {
        let mut item = LineItem::new("a", "Mug", Decimal::ONE, u32::MAX).unwrap();
        item.add_quantity(NonZeroU32::MIN);
        assert_eq!(item.quantity(), u32::MAX);
    }
}
