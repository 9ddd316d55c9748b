//! Integration tests for the Menen cart store.
//!
//! # Running Tests
//!
//! ```bash
//! # Cart and persistence tests (no backend needed)
//! cargo test -p menen-integration-tests
//!
//! # Include the tests that talk to a running backend
//! MENEN_API_URL=http://localhost:5000/api cargo test -p menen-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Store behaviour against in-memory storage
//! - `cart_persistence` - Reopening carts saved to disk
//! - `checkout_backend` - Stock checks and order submission against the API

use menen_storefront::cart::{CartStore, FileStorage, LineItem};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// A cart directory that is removed when dropped.
pub struct TempCart {
    dir: TempDir,
}

impl TempCart {
    /// Create a fresh, empty cart directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Storage rooted at the temporary directory.
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.dir.path())
    }

    /// Open (or reopen) the cart under the default key.
    #[must_use]
    pub fn open(&self) -> CartStore<FileStorage> {
        CartStore::open(self.storage())
    }

    /// Path of the blob written for `key`.
    #[must_use]
    pub fn blob_path(&self, key: &str) -> std::path::PathBuf {
        self.dir.path().join(format!("{key}.json"))
    }
}

impl Default for TempCart {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a line item from whole-cent amounts.
///
/// # Panics
///
/// Panics on a zero quantity.
#[must_use]
#[allow(clippy::expect_used)]
pub fn item(id: &str, title: &str, cents: i64, quantity: u32) -> LineItem {
    LineItem::new(id, title, Decimal::new(cents, 2), quantity).expect("valid line item")
}
