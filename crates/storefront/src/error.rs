//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for callers that drive the cart and
//! checkout together, plus reporting helpers for failures that are logged
//! and captured to Sentry rather than returned.

use thiserror::Error;

use crate::api::ApiError;
use crate::cart::{LineItemError, StorageError};
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backend API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout was refused.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Line item input was invalid.
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] LineItemError),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the error is worth capturing to Sentry.
    ///
    /// User mistakes (bad input, insufficient stock, empty cart) are not.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Config(_) => true,
            Self::Api(err) => !matches!(err, ApiError::Unauthorized),
            Self::Checkout(err) => matches!(err, CheckoutError::Api(_)),
            Self::InvalidItem(_) | Self::BadRequest(_) => false,
        }
    }

    /// Log the error and capture it to Sentry when reportable.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Request refused");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Report a cart persistence failure.
///
/// Writes are fire-and-forget from the store's point of view: the failure is
/// logged and captured, and the in-memory cart carries on.
pub fn report_storage_failure(key: &str, error: &StorageError) {
    let event_id = sentry::capture_error(error);
    tracing::error!(
        key,
        error = %error,
        sentry_event_id = %event_id,
        "Failed to persist cart, continuing with in-memory state"
    );
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("craft_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("price is not a number".to_string());
        assert_eq!(err.to_string(), "Bad request: price is not a number");

        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Checkout error: cart is empty");
    }

    #[test]
    fn test_user_errors_are_not_reportable() {
        assert!(!AppError::from(CheckoutError::EmptyCart).is_reportable());
        assert!(
            !AppError::from(CheckoutError::InsufficientStock {
                requested: 3,
                available: 1
            })
            .is_reportable()
        );
        assert!(!AppError::from(LineItemError::ZeroQuantity).is_reportable());
        assert!(!AppError::from(ApiError::Unauthorized).is_reportable());
    }

    #[test]
    fn test_infrastructure_errors_are_reportable() {
        let io = std::io::Error::other("disk full");
        assert!(AppError::from(StorageError::Io(io)).is_reportable());
        assert!(AppError::from(CheckoutError::Api(ApiError::Status {
            status: 500,
            body: String::new()
        }))
        .is_reportable());
    }

    #[test]
    fn test_reporting_without_sentry_client_is_noop() {
        let io = std::io::Error::other("disk full");
        report_storage_failure("menen_cart", &StorageError::Io(io));
        add_breadcrumb("cart", "Cleared cart", None);
    }
}
