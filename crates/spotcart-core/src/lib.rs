//! Variant resolution and option-state engine for the hotspot product popup.

pub mod app_config;
pub mod config;
pub mod error;
pub mod format;
pub mod markup;
pub mod payload;
pub mod popup;
pub mod product;
pub mod rules;
pub mod selection;
pub mod view;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use popup::{
    CrossSellKey, Popup, PopupEvent, PurchaseOutcome, PurchaseState, PurchaseTicket,
};
pub use product::{OptionKind, OptionValue, Product, ProductOption, Swatch, Variant};
pub use rules::{load_rules, CrossSellRule, RulesFile};
pub use selection::{Selection, SlotKey};
pub use view::PopupView;
