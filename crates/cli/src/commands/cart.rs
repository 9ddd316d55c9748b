//! Cart subcommands.

use menen_core::CraftId;
use menen_storefront::api::ApiClient;
use menen_storefront::cart::{CartStorage, CartStore, LineItem, OrderSummary, QuantityUpdate};
use menen_storefront::checkout::{self, ShippingMethod};
use menen_storefront::config::StorefrontConfig;
use menen_storefront::error::{AppError, add_breadcrumb};
use rust_decimal::Decimal;

use crate::render;

/// Fields of the `add` subcommand.
pub struct AddInput {
    pub id: CraftId,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
    pub artisan: Option<String>,
}

impl AddInput {
    fn into_item(self) -> Result<LineItem, AppError> {
        let mut item = LineItem::new(self.id, self.title, self.price, self.quantity)?;
        if let Some(image) = self.image {
            item = item.with_image(image);
        }
        if let Some(artisan) = self.artisan {
            item = item.with_artisan(artisan);
        }
        Ok(item)
    }
}

/// Print the cart lines followed by the order summary.
pub fn show<S: CartStorage>(store: &CartStore<S>, config: &StorefrontConfig) {
    render::emit(&render::cart_lines(store.state()));
    if !store.is_empty() {
        let summary = OrderSummary::calculate(store.state(), &config.pricing);
        render::emit(&render::summary(&summary));
    }
}

/// Add an item, optionally checking live stock first.
///
/// The stock check covers the units already in the cart plus the new ones.
pub async fn add<S: CartStorage>(
    store: &mut CartStore<S>,
    config: &StorefrontConfig,
    input: AddInput,
    check_stock: bool,
) -> Result<(), AppError> {
    let item = input.into_item()?;
    let id = item.id().clone();
    add_breadcrumb("cart", "Added to cart", Some(&[("craft_id", id.as_str())]));

    if check_stock {
        let client = ApiClient::new(&config.api)?;
        let level = client.craft_stock(&id).await?;
        let in_cart = store.get(&id).map_or(0, LineItem::quantity);
        checkout::add_with_stock_check(
            store,
            item,
            level.available.saturating_sub(in_cart),
        )?;
    } else {
        store.add_item(item);
    }

    render::emit(&format!("Added {id}. {} item(s) in cart", store.count()));
    Ok(())
}

/// Remove a line.
pub fn remove<S: CartStorage>(store: &mut CartStore<S>, id: &CraftId) {
    match store.remove_item(id) {
        Some(item) => render::emit(&format!("Removed {}", item.title)),
        None => render::emit(&format!("{id} is not in the cart")),
    }
}

/// Set a line's quantity, optionally re-validating stock first.
pub async fn set<S: CartStorage>(
    store: &mut CartStore<S>,
    config: &StorefrontConfig,
    id: &CraftId,
    quantity: u32,
    check_stock: bool,
) -> Result<(), AppError> {
    let outcome = if check_stock {
        let client = ApiClient::new(&config.api)?;
        checkout::change_quantity(store, &client, id, quantity).await?
    } else {
        store.update_quantity(id, quantity)
    };

    match outcome {
        QuantityUpdate::Updated => render::emit(&format!("{id} now x{quantity}")),
        QuantityUpdate::Removed => render::emit(&format!("Removed {id}")),
        QuantityUpdate::NotFound => {
            return Err(AppError::BadRequest(format!("{id} is not in the cart")));
        }
    }
    Ok(())
}

/// Empty the cart.
pub fn clear<S: CartStorage>(store: &mut CartStore<S>) {
    store.clear();
    add_breadcrumb("cart", "Cleared cart", None);
    render::emit("Cart cleared");
}

/// Print the number of units in the cart.
pub fn count<S: CartStorage>(store: &CartStore<S>) {
    render::emit(&store.count().to_string());
}

/// Print subtotal, shipping, tax and total.
pub fn summary<S: CartStorage>(
    store: &CartStore<S>,
    config: &StorefrontConfig,
    shipping: Option<ShippingMethod>,
) {
    let summary = match shipping {
        Some(method) => {
            render::emit(method.label());
            method.quote(store.state(), &config.pricing)
        }
        None => OrderSummary::calculate(store.state(), &config.pricing),
    };
    render::emit(&render::summary(&summary));
}
