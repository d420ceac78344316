//! Request and response shapes for the storefront's Ajax cart API.
//!
//! ### `POST /cart/add.js`
//! Accepts either a single line (`{ id, quantity }`) or a batch
//! (`{ items: [{ id, quantity }] }`). A single-line request may also ask the
//! storefront to render cart sections in the same round trip by passing
//! `sections` (section ids) and `sections_url` (the page those sections
//! belong to); the rendered HTML comes back under `sections` in the response.
//!
//! On failure the body is `{ "status": 422, "message": "Cart Error",
//! "description": "All 1 Parka - Medium are in your cart." }`. Only
//! `description` is meant for shoppers.
//!
//! ### `GET /products/{handle}.js`
//! The same product shape as a hotspot payload, including `variants[].available`.

use serde::{Deserialize, Serialize};

/// Message used when a failed cart response carries no `description`.
pub const GENERIC_CART_ERROR: &str = "Error";

/// Body of a single-line `POST /cart/add.js`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddToCartRequest {
    pub id: u64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections_url: Option<String>,
}

impl AddToCartRequest {
    /// One unit of `variant_id`, with no section rendering.
    #[must_use]
    pub fn single(variant_id: u64) -> Self {
        Self {
            id: variant_id,
            quantity: 1,
            sections: None,
            sections_url: None,
        }
    }
}

/// One entry of a batch add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: u64,
    pub quantity: u32,
}

/// Body of a batch `POST /cart/add.js`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddItemsRequest {
    pub items: Vec<CartLine>,
}

/// Error envelope returned with a non-success cart status.
#[derive(Debug, Default, Deserialize)]
pub struct CartErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
