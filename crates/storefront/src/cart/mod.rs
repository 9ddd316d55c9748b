//! Shopping cart state manager.
//!
//! # Architecture
//!
//! - [`CartState`] is the pure model: ordered line items unique by id, plus a
//!   total recomputed from the items on every mutation
//! - [`CartStore`] wraps the state and writes it through to a [`CartStorage`]
//!   adapter after every effective change, restoring it on open
//! - [`OrderSummary`] derives shipping, tax and grand total for display
//!
//! The store never talks to the backend API. Stock checks and order
//! submission live in [`crate::checkout`].
//!
//! # Example
//!
//! ```rust
//! use menen_core::CraftId;
//! use menen_storefront::cart::{CartStore, LineItem, MemoryStorage};
//! use rust_decimal::Decimal;
//!
//! let mut store = CartStore::open(MemoryStorage::new());
//! store.add_item(LineItem::new("a", "Clay mug", Decimal::TEN, 2).unwrap());
//! store.add_item(LineItem::new("a", "Clay mug", Decimal::TEN, 1).unwrap());
//!
//! assert_eq!(store.count(), 3);
//! assert_eq!(store.total(), Decimal::from(30));
//!
//! store.update_quantity(&CraftId::new("a"), 0);
//! assert!(store.is_empty());
//! ```

mod item;
mod state;
pub mod storage;
mod store;
mod summary;

pub use item::{LineItem, LineItemError, MAX_UNIT_PRICE};
pub use state::{CartState, CartStateError, QuantityUpdate};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CartStore, DEFAULT_CART_KEY};
pub use summary::{OrderSummary, PricingPolicy};
