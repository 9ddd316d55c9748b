//! Cart contents and the derived total.
//!
//! Every mutation recomputes the total from the full item list, so
//! `total == Σ(unit_price × quantity)` holds for every reachable state.

use std::collections::HashSet;
use std::num::NonZeroU32;

use menen_core::{CraftId, Price, round_cents};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::LineItem;

/// Reasons a persisted cart is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartStateError {
    /// Two lines share an id.
    #[error("duplicate line item {0}")]
    DuplicateItem(CraftId),

    /// A line has a negative or out-of-range unit price.
    #[error("line item {0} has an invalid unit price")]
    InvalidPrice(CraftId),
}

/// Outcome of [`CartState::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now has the requested quantity.
    Updated,
    /// A quantity of zero removed the line.
    Removed,
    /// No line with that id.
    NotFound,
}

/// The full set of line items plus the derived total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedCart")]
pub struct CartState {
    items: Vec<LineItem>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    total: Decimal,
}

impl CartState {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from line items.
    ///
    /// # Errors
    ///
    /// Returns `CartStateError` if two items share an id or a price is negative
    /// or above [`MAX_UNIT_PRICE`](super::MAX_UNIT_PRICE).
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartStateError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !item.has_valid_price() {
                return Err(CartStateError::InvalidPrice(item.id().clone()));
            }
            if !seen.insert(item.id()) {
                return Err(CartStateError::DuplicateItem(item.id().clone()));
            }
        }

        let total = compute_total(&items);
        Ok(Self { items, total })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all line totals.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Total as a display price.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::usd(self.total)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: &CraftId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Add an item, merging quantities into an existing line with the same id.
    ///
    /// A merged line keeps its original price and display metadata.
    pub fn add(&mut self, item: LineItem) {
        match self.items.iter_mut().find(|line| line.id() == item.id()) {
            Some(line) => line.add_quantity(item.quantity_nonzero()),
            None => self.items.push(item),
        }
        self.recompute();
    }

    /// Remove the line with `id`, returning it if present.
    pub fn remove(&mut self, id: &CraftId) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        let removed = self.items.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Replace the quantity of the line with `id`. Zero removes the line.
    pub fn set_quantity(&mut self, id: &CraftId, quantity: u32) -> QuantityUpdate {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            return match self.remove(id) {
                Some(_) => QuantityUpdate::Removed,
                None => QuantityUpdate::NotFound,
            };
        };

        let Some(line) = self.items.iter_mut().find(|item| item.id() == id) else {
            return QuantityUpdate::NotFound;
        };
        line.set_quantity(quantity);
        self.recompute();
        QuantityUpdate::Updated
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.total = compute_total(&self.items);
    }
}

fn compute_total(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()))
}

// =============================================================================
// Persisted Form
// =============================================================================

/// On-disk shape `{ items, total }`. Both fields are optional; the stored
/// total is advisory and always recomputed, so it is read as a plain `f64`
/// and never rejects the blob.
#[derive(Deserialize)]
struct PersistedCart {
    #[serde(default)]
    items: Vec<LineItem>,
    #[serde(default)]
    total: Option<f64>,
}

impl TryFrom<PersistedCart> for CartState {
    type Error = CartStateError;

    fn try_from(persisted: PersistedCart) -> Result<Self, Self::Error> {
        let state = Self::from_items(persisted.items)?;
        if let Some(stored) = persisted.total
            && Decimal::from_f64_retain(stored).map(round_cents) != Some(round_cents(state.total))
        {
            tracing::debug!(
                stored,
                recomputed = %state.total,
                "Persisted cart total drifted from its items"
            );
        }
        Ok(state)
    }
}
