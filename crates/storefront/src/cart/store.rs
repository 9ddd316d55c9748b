//! The cart store: in-memory cart state written through to durable storage.

use menen_core::CraftId;
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use super::item::LineItem;
use super::state::{CartState, QuantityUpdate};
use super::storage::{CartStorage, StorageError};
use crate::error::report_storage_failure;

/// Storage key the cart is persisted under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "menen_cart";

/// Cart store bound to a storage adapter.
///
/// Mutators update the in-memory state, recompute the total and write the
/// full state to storage. A failed write is logged and reported but never
/// returned: the in-memory state stays authoritative. Calls that change
/// nothing (unknown ids) do not write.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    storage: S,
    key: String,
    state: CartState,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart persisted under [`DEFAULT_CART_KEY`].
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, DEFAULT_CART_KEY)
    }

    /// Open the cart persisted under `key`.
    ///
    /// Missing, unreadable or malformed state starts an empty cart.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = restore(&storage, &key);
        Self {
            storage,
            key,
            state,
        }
    }

    /// Add an item, merging into an existing line with the same id.
    #[instrument(skip(self, item), fields(id = %item.id(), quantity = item.quantity()))]
    pub fn add_item(&mut self, item: LineItem) {
        self.state.add(item);
        self.persist();
    }

    /// Remove the line with `id`. Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &CraftId) -> Option<LineItem> {
        let removed = self.state.remove(id);
        if removed.is_some() {
            self.persist();
        } else {
            debug!("Remove ignored, item not in cart");
        }
        removed
    }

    /// Set the quantity of the line with `id`. Zero removes the line.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: &CraftId, quantity: u32) -> QuantityUpdate {
        let outcome = self.state.set_quantity(id, quantity);
        match outcome {
            QuantityUpdate::Updated | QuantityUpdate::Removed => self.persist(),
            QuantityUpdate::NotFound => debug!("Quantity update ignored, item not in cart"),
        }
        outcome
    }

    /// Empty the cart and persist the empty state.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.state.clear();
        self.persist();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.state.count()
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.state.items()
    }

    /// Sum of all line totals.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.state.total()
    }

    /// Current cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: &CraftId) -> Option<&LineItem> {
        self.state.get(id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage adapter.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning its state.
    #[must_use]
    pub fn into_state(self) -> CartState {
        self.state
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.state)
            .map_err(StorageError::from)
            .and_then(|blob| self.storage.save(&self.key, &blob));

        match result {
            Ok(()) => debug!(
                key = %self.key,
                lines = self.state.len(),
                total = %self.state.total(),
                "Cart persisted"
            ),
            Err(e) => report_storage_failure(&self.key, &e),
        }
    }
}

fn restore<S: CartStorage>(storage: &S, key: &str) -> CartState {
    let blob = match storage.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => return CartState::default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted cart, starting empty");
            return CartState::default();
        }
    };

    match serde_json::from_str::<CartState>(&blob) {
        Ok(state) => {
            debug!(key, lines = state.len(), "Cart restored");
            state
        }
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed persisted cart");
            CartState::default()
        }
    }
}
