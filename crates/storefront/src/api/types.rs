//! Request and response bodies exchanged with the marketplace backend.

use menen_core::{OrderId, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response of `GET /crafts/{id}/stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Units that can still be ordered.
    pub available: u32,
}

/// Order record returned by `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub id: OrderId,
    pub order_number: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
}
