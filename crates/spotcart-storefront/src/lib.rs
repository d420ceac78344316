//! Storefront side of the hotspot popup: the Ajax cart client, cross-sell
//! and the add-to-cart flow.

pub mod cart;
pub mod client;
pub mod cross_sell;
pub mod error;
pub mod purchase;
pub mod types;

pub use cart::{CartCollaborator, NoCart, SectionRef};
pub use client::StorefrontClient;
pub use cross_sell::{run_cross_sell, CrossSellResult};
pub use error::StorefrontError;
pub use purchase::{PurchaseFlow, PurchaseReport, Submission};
pub use types::{AddItemsRequest, AddToCartRequest, CartLine};
