//! Add-to-cart flow around a [`Popup`].
//!
//! [`PurchaseFlow::activate_purchase`] drives the whole sequence against a
//! borrowed popup. Callers that must keep handling popup events while the
//! request is in flight use the three steps directly:
//! [`Popup::begin_purchase`], [`PurchaseFlow::submit`] (which holds no popup
//! state) and [`Popup::finish_purchase`].

use std::sync::Arc;

use serde_json::Value;
use spotcart_core::{Popup, PurchaseOutcome, PurchaseTicket, RulesFile};

use crate::cart::CartCollaborator;
use crate::client::StorefrontClient;
use crate::cross_sell::{run_cross_sell, CrossSellResult};
use crate::error::StorefrontError;
use crate::types::AddToCartRequest;

const DEFAULT_PAGE_PATH: &str = "/";

/// Result of a successful add, before it is applied to the popup.
#[derive(Debug, Clone)]
pub struct Submission {
    pub response: Value,
    pub cross_sell: CrossSellResult,
}

#[derive(Debug, Clone)]
pub struct PurchaseReport {
    pub ticket: PurchaseTicket,
    pub outcome: PurchaseOutcome,
    /// `None` when the add itself failed and cross-sell never ran.
    pub cross_sell: Option<CrossSellResult>,
}

pub struct PurchaseFlow {
    client: StorefrontClient,
    rules: RulesFile,
    cart: Option<Arc<dyn CartCollaborator>>,
    page_path: String,
}

impl PurchaseFlow {
    #[must_use]
    pub fn new(client: StorefrontClient, rules: RulesFile) -> Self {
        Self {
            client,
            rules,
            cart: None,
            page_path: DEFAULT_PAGE_PATH.to_owned(),
        }
    }

    #[must_use]
    pub fn with_cart(mut self, cart: Arc<dyn CartCollaborator>) -> Self {
        self.cart = Some(cart);
        self
    }

    /// Path of the page the cart sections belong to.
    #[must_use]
    pub fn with_page_path(mut self, page_path: impl Into<String>) -> Self {
        self.page_path = page_path.into();
        self
    }

    #[must_use]
    pub fn client(&self) -> &StorefrontClient {
        &self.client
    }

    /// Add-to-cart body for `ticket`, asking for section rendering when the
    /// cart collaborator supports it.
    #[must_use]
    pub fn build_request(&self, ticket: &PurchaseTicket) -> AddToCartRequest {
        let mut request = AddToCartRequest::single(ticket.variant_id);
        if let Some(sections) = self.cart.as_ref().and_then(|c| c.sections_to_render()) {
            request.sections = Some(sections.into_iter().map(|s| s.id).collect());
            request.sections_url = Some(self.page_path.clone());
        }
        request
    }

    /// Posts the add request, runs cross-sell and hands the response to the
    /// cart collaborator. The cart is refreshed even if the popup that issued
    /// `ticket` has since closed.
    ///
    /// # Errors
    ///
    /// Returns the add-to-cart error. Cross-sell failures are never returned.
    pub async fn submit(&self, ticket: &PurchaseTicket) -> Result<Submission, StorefrontError> {
        let request = self.build_request(ticket);
        let response = self.client.add_to_cart(&request).await?;
        tracing::info!(
            generation = ticket.generation,
            variant_id = ticket.variant_id,
            "variant added to cart"
        );

        let cross_sell = run_cross_sell(&self.client, &self.rules, ticket.cross_sell.as_ref()).await;

        if let Some(cart) = &self.cart {
            cart.render_contents(&response);
        }

        Ok(Submission {
            response,
            cross_sell,
        })
    }

    /// Runs a full purchase for the popup's resolved variant.
    ///
    /// Returns `None` without any request when nothing is resolved or a
    /// purchase is already in flight. Failures end up in the popup's notice.
    pub async fn activate_purchase(&self, popup: &mut Popup) -> Option<PurchaseReport> {
        let ticket = popup.begin_purchase()?;

        let (outcome, cross_sell) = match self.submit(&ticket).await {
            Ok(submission) => (PurchaseOutcome::Added, Some(submission.cross_sell)),
            Err(e) => {
                tracing::debug!(error = %e, "add to cart failed");
                (
                    PurchaseOutcome::Rejected {
                        message: e.notice_message(),
                    },
                    None,
                )
            }
        };

        popup.finish_purchase(&ticket, outcome.clone());
        Some(PurchaseReport {
            ticket,
            outcome,
            cross_sell,
        })
    }
}
