//! Checkout glue around the cart store.
//!
//! The cart store never calls the backend. The helpers here do, on behalf of
//! the caller:
//!
//! - [`change_quantity`] re-validates stock before touching the cart
//! - [`add_with_stock_check`] guards adds against a known stock count
//! - [`place_order`] submits the cart and clears it once the order is accepted
//!
//! Cached unit prices and availability are never trusted as server truth;
//! the backend re-prices the order it receives.

mod order;

pub use order::{OrderLine, OrderRequest, PaymentMethod, ShippingMethod};

use std::future::Future;

use menen_core::CraftId;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, CreatedOrder};
use crate::cart::{CartStorage, CartStore, LineItem, QuantityUpdate};

/// Reasons a checkout step was refused.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Not enough units in stock for the requested quantity.
    #[error("only {available} available (requested {requested})")]
    InsufficientStock { requested: u32, available: u32 },

    /// The item is not in the cart.
    #[error("item {0} is not in the cart")]
    NotInCart(CraftId),

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Source of live stock levels.
pub trait StockLookup {
    /// Units of `id` that can still be ordered.
    fn available(&self, id: &CraftId) -> impl Future<Output = Result<u32, ApiError>> + Send;
}

/// Destination for submitted orders.
pub trait OrderSubmitter {
    /// Submit `order`, returning the created order if the backend echoes one.
    fn submit(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<Option<CreatedOrder>, ApiError>> + Send;
}

/// Set a line's quantity after confirming enough stock exists.
///
/// A quantity of zero removes the line without consulting stock. On
/// insufficient stock the cart is left unchanged.
///
/// # Errors
///
/// Returns `CheckoutError::NotInCart` for unknown ids,
/// `CheckoutError::InsufficientStock` when the backend has fewer units than
/// requested, and `CheckoutError::Api` when the lookup fails.
#[instrument(skip(store, stock))]
pub async fn change_quantity<S: CartStorage, L: StockLookup>(
    store: &mut CartStore<S>,
    stock: &L,
    id: &CraftId,
    quantity: u32,
) -> Result<QuantityUpdate, CheckoutError> {
    if store.get(id).is_none() {
        return Err(CheckoutError::NotInCart(id.clone()));
    }

    if quantity > 0 {
        let available = stock.available(id).await?;
        if quantity > available {
            warn!(requested = quantity, available, "Insufficient stock");
            return Err(CheckoutError::InsufficientStock {
                requested: quantity,
                available,
            });
        }
    }

    Ok(store.update_quantity(id, quantity))
}

/// Add an item if `available` covers the quantity being added.
///
/// # Errors
///
/// Returns `CheckoutError::InsufficientStock` when it does not; the cart is
/// left unchanged.
pub fn add_with_stock_check<S: CartStorage>(
    store: &mut CartStore<S>,
    item: LineItem,
    available: u32,
) -> Result<(), CheckoutError> {
    let requested = item.quantity();
    if available < requested {
        warn!(craft_id = %item.id(), requested, available, "Insufficient stock");
        return Err(CheckoutError::InsufficientStock {
            requested,
            available,
        });
    }
    store.add_item(item);
    Ok(())
}

/// Submit the cart as an order and clear it once the backend accepts.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart and
/// `CheckoutError::Api` if submission fails; the cart is kept in both cases.
#[instrument(skip(store, orders))]
pub async fn place_order<S: CartStorage, O: OrderSubmitter>(
    store: &mut CartStore<S>,
    orders: &O,
    shipping: ShippingMethod,
    payment: PaymentMethod,
) -> Result<Option<CreatedOrder>, CheckoutError> {
    let request = OrderRequest::from_cart(store.state(), shipping, payment)?;
    let created = orders.submit(&request).await?;

    info!(
        lines = request.items.len(),
        order_number = created.as_ref().map_or("unknown", |o| o.order_number.as_str()),
        "Order placed"
    );
    store.clear();
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use menen_core::{OrderId, OrderStatus};
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::MemoryStorage;

    struct FixedStock(HashMap<&'static str, u32>);

    impl StockLookup for FixedStock {
        async fn available(&self, id: &CraftId) -> Result<u32, ApiError> {
            self.0.get(id.as_str()).copied().ok_or(ApiError::Status {
                status: 404,
                body: "craft not found".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingOrders {
        submitted: Mutex<Vec<OrderRequest>>,
        fail: bool,
    }

    impl OrderSubmitter for RecordingOrders {
        async fn submit(&self, order: &OrderRequest) -> Result<Option<CreatedOrder>, ApiError> {
            if self.fail {
                return Err(ApiError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.submitted.lock().unwrap().push(order.clone());
            Ok(Some(CreatedOrder {
                id: OrderId::new(1),
                order_number: "ORD-1".to_string(),
                total_amount: Decimal::ZERO,
                status: OrderStatus::Pending,
            }))
        }
    }

    fn store_with(id: &str, quantity: u32) -> CartStore<MemoryStorage> {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add_item(LineItem::new(id, "Vase", Decimal::from(25), quantity).unwrap());
        store
    }

    #[tokio::test]
    async fn test_change_quantity_within_stock() {
        let mut store = store_with("a", 1);
        let stock = FixedStock(HashMap::from([("a", 5)]));

        let outcome = change_quantity(&mut store, &stock, &CraftId::new("a"), 5)
            .await
            .unwrap();
        assert_eq!(outcome, QuantityUpdate::Updated);
        assert_eq!(store.total(), Decimal::from(125));
    }

    #[tokio::test]
    async fn test_change_quantity_insufficient_stock_leaves_cart() {
        let mut store = store_with("a", 1);
        let stock = FixedStock(HashMap::from([("a", 2)]));

        let err = change_quantity(&mut store, &stock, &CraftId::new("a"), 3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_change_quantity_zero_skips_lookup() {
        let mut store = store_with("a", 1);
        let stock = FixedStock(HashMap::new());

        let outcome = change_quantity(&mut store, &stock, &CraftId::new("a"), 0)
            .await
            .unwrap();
        assert_eq!(outcome, QuantityUpdate::Removed);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_change_quantity_lookup_failure() {
        let mut store = store_with("a", 1);
        let stock = FixedStock(HashMap::new());

        let err = change_quantity(&mut store, &stock, &CraftId::new("a"), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Api(_)));
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_change_quantity_unknown_item() {
        let mut store = store_with("a", 1);
        let stock = FixedStock(HashMap::from([("b", 9)]));

        let err = change_quantity(&mut store, &stock, &CraftId::new("b"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::NotInCart(_)));
    }

    #[test]
    fn test_add_with_stock_check() {
        let mut store = CartStore::open(MemoryStorage::new());
        let item = LineItem::new("a", "Rug", Decimal::from(80), 3).unwrap();

        assert!(add_with_stock_check(&mut store, item.clone(), 2).is_err());
        assert!(store.is_empty());

        add_with_stock_check(&mut store, item, 3).unwrap();
        assert_eq!(store.count(), 3);
    }

    #[tokio::test]
    async fn test_place_order_submits_and_clears() {
        let mut store = store_with("a", 2);
        let orders = RecordingOrders::default();

        let created = place_order(
            &mut store,
            &orders,
            ShippingMethod::Express,
            PaymentMethod::Paypal,
        )
        .await
        .unwrap();

        assert_eq!(created.unwrap().order_number, "ORD-1");
        assert!(store.is_empty());

        let submitted = orders.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        let request = submitted.first().unwrap();
        assert_eq!(request.items.first().unwrap().quantity, 2);
        assert_eq!(request.shipping_method, ShippingMethod::Express);
    }

    #[tokio::test]
    async fn test_place_order_failure_keeps_cart() {
        let mut store = store_with("a", 2);
        let orders = RecordingOrders {
            fail: true,
            ..Default::default()
        };

        let err = place_order(&mut store, &orders, ShippingMethod::Standard, PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Api(_)));
        assert_eq!(store.count(), 2);
    }

    #[tokio::test]
    async fn test_place_order_empty_cart() {
        let mut store = CartStore::open(MemoryStorage::new());
        let orders = RecordingOrders::default();

        let err = place_order(&mut store, &orders, ShippingMethod::Standard, PaymentMethod::Card)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(orders.submitted.lock().unwrap().is_empty());
    }
}
