//! HTTP client for the storefront's Ajax cart and product endpoints.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use spotcart_core::Product;

use crate::error::StorefrontError;
use crate::types::{AddItemsRequest, AddToCartRequest, CartErrorBody, GENERIC_CART_ERROR};

/// Client for one storefront.
///
/// Requests are never retried: a repeated `cart/add.js` would add the item
/// twice.
pub struct StorefrontClient {
    client: Client,
    origin: Url,
}

impl StorefrontClient {
    /// Creates a client for the store at `store_url`. Any path on the URL is
    /// dropped; endpoints resolve against the origin.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StorefrontError::InvalidStoreUrl`] if
    /// `store_url` does not parse or has no scheme/host origin.
    pub fn new(
        store_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StorefrontError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(store_url).map_err(|e| StorefrontError::InvalidStoreUrl {
            store_url: store_url.to_owned(),
            reason: e.to_string(),
        })?;
        let origin = parsed.origin();
        if !origin.is_tuple() {
            return Err(StorefrontError::InvalidStoreUrl {
                store_url: store_url.to_owned(),
                reason: "URL has no scheme/host origin".to_owned(),
            });
        }
        let origin = Url::parse(&origin.ascii_serialization()).map_err(|e| {
            StorefrontError::InvalidStoreUrl {
                store_url: store_url.to_owned(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { client, origin })
    }

    /// Adds one cart line and returns the storefront's JSON response.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::CartRejected`] on any non-success status.
    /// - [`StorefrontError::Http`] on network failure.
    /// - [`StorefrontError::Deserialize`] if a success body is not JSON.
    pub async fn add_to_cart(
        &self,
        request: &AddToCartRequest,
    ) -> Result<serde_json::Value, StorefrontError> {
        self.post_cart_add(request).await
    }

    /// Adds several lines in one request.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_to_cart`].
    pub async fn add_items(
        &self,
        request: &AddItemsRequest,
    ) -> Result<serde_json::Value, StorefrontError> {
        self.post_cart_add(request).await
    }

    /// Fetches a product's JSON description by handle.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotFound`] on HTTP 404.
    /// - [`StorefrontError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`StorefrontError::Http`] on network failure.
    /// - [`StorefrontError::Deserialize`] if the body is not a product.
    pub async fn fetch_product(&self, handle: &str) -> Result<Product, StorefrontError> {
        let url = self.endpoint(&format!("/products/{handle}.js"));

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorefrontError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(StorefrontError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Product>(&body).map_err(|e| StorefrontError::Deserialize {
            context: format!("product {handle}"),
            source: e,
        })
    }

    async fn post_cart_add<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<serde_json::Value, StorefrontError> {
        let url = self.endpoint("/cart/add.js");

        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<CartErrorBody>(&text).unwrap_or_default();
            let message = parsed
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| GENERIC_CART_ERROR.to_owned());
            tracing::warn!(
                status = status.as_u16(),
                message = %message,
                "cart add rejected"
            );
            return Err(StorefrontError::CartRejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<serde_json::Value>(&text).map_err(|e| {
            StorefrontError::Deserialize {
                context: format!("cart add response from {url}"),
                source: e,
            }
        })
    }

    /// Resolves `path` against the store origin.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.origin.clone();
        url.set_path(path);
        url
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
