//! Best-effort secondary add triggered by the purchased variant's options.

use spotcart_core::{CrossSellKey, RulesFile};

use crate::client::StorefrontClient;
use crate::types::{AddItemsRequest, CartLine};

/// What the cross-sell step did. Never an error: failures are logged and
/// reported here only for observability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossSellResult {
    /// The product lacks a color or size option, or no rule matched.
    NotApplicable,
    Added { handle: String, variant_id: u64 },
    /// The rule's product has no available variant.
    Unavailable { handle: String },
    Failed { handle: String },
}

/// Runs the first rule matching `key`, if any.
pub async fn run_cross_sell(
    client: &StorefrontClient,
    rules: &RulesFile,
    key: Option<&CrossSellKey>,
) -> CrossSellResult {
    let Some(key) = key else {
        return CrossSellResult::NotApplicable;
    };
    let Some(rule) = rules.find_cross_sell(&key.color, &key.size) else {
        return CrossSellResult::NotApplicable;
    };
    let handle = rule.handle.clone();

    let product = match client.fetch_product(&handle).await {
        Ok(product) => product,
        Err(e) => {
            tracing::warn!(handle = %handle, error = %e, "cross-sell product lookup failed");
            return CrossSellResult::Failed { handle };
        }
    };

    let Some(variant) = product.first_available_variant() else {
        tracing::debug!(handle = %handle, "cross-sell product has no available variant");
        return CrossSellResult::Unavailable { handle };
    };
    let variant_id = variant.id;

    let request = AddItemsRequest {
        items: vec![CartLine {
            id: variant_id,
            quantity: 1,
        }],
    };
    match client.add_items(&request).await {
        Ok(_) => {
            tracing::info!(handle = %handle, variant_id, "cross-sell item added");
            CrossSellResult::Added { handle, variant_id }
        }
        Err(e) => {
            tracing::warn!(handle = %handle, variant_id, error = %e, "cross-sell add failed");
            CrossSellResult::Failed { handle }
        }
    }
}
