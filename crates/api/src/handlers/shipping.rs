//! Checkout delivery customization.
//!
//! Called by the storefront checkout with the visitor's cart. The endpoint
//! is stateless and unauthenticated.

use axum::Json;
use cgk_core::delivery_customization::{self, Cart, CustomizationResult};

/// POST /api/v1/shipping/delivery-customization
pub async fn delivery_customization(Json(cart): Json<Cart>) -> Json<CustomizationResult> {
    let result = delivery_customization::customize(&cart);
    if !result.operations.is_empty() {
        tracing::debug!(
            variant = cart.shipping_variant.as_deref().unwrap_or_default(),
            hidden = result.operations.len(),
            "Delivery options hidden"
        );
    }
    Json(result)
}
