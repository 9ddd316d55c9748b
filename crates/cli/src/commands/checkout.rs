//! Checkout subcommand.

use menen_storefront::api::ApiClient;
use menen_storefront::cart::{CartStorage, CartStore};
use menen_storefront::checkout::{self, PaymentMethod, ShippingMethod};
use menen_storefront::config::StorefrontConfig;
use menen_storefront::error::AppError;

use crate::render;

/// Submit the cart as an order.
///
/// The quote is printed before submission; the cart is only cleared once the
/// backend accepts the order.
pub async fn place<S: CartStorage>(
    store: &mut CartStore<S>,
    config: &StorefrontConfig,
    shipping: ShippingMethod,
    payment: PaymentMethod,
) -> Result<(), AppError> {
    let quote = shipping.quote(store.state(), &config.pricing);
    render::emit(&format!("{} / {}", shipping.label(), payment.label()));
    render::emit(&render::summary(&quote));

    let client = ApiClient::new(&config.api)?;
    let created = checkout::place_order(store, &client, shipping, payment).await?;

    match created {
        Some(order) => render::emit(&format!(
            "Order {} placed ({})",
            order.order_number, order.status
        )),
        None => render::emit("Order placed"),
    }
    Ok(())
}
