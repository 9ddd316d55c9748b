//! Plain-text rendering of cart state for the terminal.

use std::fmt::Write;

use menen_core::Price;
use menen_storefront::cart::{CartState, OrderSummary};

/// Shown instead of the line list when the cart has nothing in it.
pub const EMPTY_CART: &str = "Your cart is empty. Add some handmade crafts to get started!";

/// Write `text` to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{text}");
}

/// One block per line: title, artisan, quantity × price = line total.
pub fn cart_lines(cart: &CartState) -> String {
    if cart.is_empty() {
        return EMPTY_CART.to_string();
    }

    let mut out = String::new();
    for item in cart.items() {
        let _ = write!(out, "{} [{}]", item.title, item.id());
        if !item.artisan_label.is_empty() {
            let _ = write!(out, " by {}", item.artisan_label);
        }
        let _ = writeln!(
            out,
            "\n  {} x {} = {}",
            item.quantity(),
            item.price(),
            Price::usd(item.line_total())
        );
    }

    let lines = cart.len();
    let _ = write!(
        out,
        "{lines} item{} in your cart",
        if lines == 1 { "" } else { "s" }
    );
    out
}

/// Label/amount table followed by the free shipping hint.
pub fn summary(summary: &OrderSummary) -> String {
    let mut out = String::new();
    for (label, price) in summary.lines() {
        let amount = if label == "Shipping" && summary.ships_free() && !summary.subtotal.is_zero()
        {
            "FREE".to_string()
        } else {
            price.display()
        };
        let _ = writeln!(out, "{label:<10}{amount:>12}");
    }

    if summary.free_shipping_remaining.is_zero() {
        out.push_str("Free shipping unlocked");
    } else {
        let _ = write!(
            out,
            "{} away from free shipping ({}%)",
            Price::usd(summary.free_shipping_remaining),
            summary.free_shipping_progress
        );
    }
    out
}
