//! Subcommand implementations.

pub mod cart;
pub mod checkout;

use menen_storefront::cart::{CartStore, FileStorage};
use menen_storefront::config::StorefrontConfig;

/// Open the cart persisted in the configured directory.
pub fn open_store(config: &StorefrontConfig) -> CartStore<FileStorage> {
    let storage = FileStorage::new(&config.cart.dir);
    tracing::debug!(dir = %storage.dir().display(), key = %config.cart.key, "Opening cart");
    CartStore::open_with_key(storage, config.cart.key.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use menen_storefront::cart::LineItem;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_open_store_uses_configured_location() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorefrontConfig::from_lookup(|_| None).unwrap();
        config.cart.dir = dir.path().to_path_buf();
        config.cart.key = "cli_cart".to_string();

        let mut store = open_store(&config);
        store.add_item(LineItem::new("3", "Tea towel", Decimal::from(14), 2).unwrap());

        assert!(dir.path().join("cli_cart.json").exists());
        assert_eq!(open_store(&config).count(), 2);
    }
}
