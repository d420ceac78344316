//! Retained view model for the popup.
//!
//! [`PopupView::build`] is a pure projection of `(product, selection, ui)`.
//! The controller rebuilds it after every state change; nothing in here can
//! mutate the selection.

use crate::format::{format_price, truncate_description, SwatchFill};
use crate::product::{OptionKind, Product, ProductOption, Variant};
use crate::selection::{Selection, SlotKey};

/// Placeholder entry of the size dropdown; its value is the empty string.
pub const SIZE_PLACEHOLDER: &str = "Choose your size";

/// Transient UI state that is not part of the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    /// Dropdown currently showing its "open" affordance.
    pub open_dropdown: Option<SlotKey>,
    /// A purchase request is in flight.
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub title: String,
    pub featured_image: Option<String>,
    /// Formatted price of the resolved variant, or the product base price.
    pub price: String,
    pub description: String,
    /// Option blocks in display order (color first).
    pub options: Vec<OptionBlock>,
    pub purchase: PurchaseControl,
    /// Id of the variant the current selection resolves to.
    pub resolved_variant_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionBlock {
    /// Option name exactly as declared; clicks map back to a slot through it.
    pub label: String,
    pub slot: SlotKey,
    pub selector: Selector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Single-choice dropdown used for size. The first entry is the placeholder.
    Dropdown {
        entries: Vec<DropdownEntry>,
        open: bool,
    },
    /// Discrete buttons; color buttons carry a swatch fill.
    Buttons(Vec<ValueButton>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownEntry {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueButton {
    pub value: String,
    pub selected: bool,
    pub fill: Option<SwatchFill>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseControl {
    pub disabled: bool,
    pub loading: bool,
}

impl PopupView {
    #[must_use]
    pub fn build(product: &Product, selection: &Selection, ui: UiState) -> Self {
        let resolved: Option<&Variant> = selection.resolve(&product.variants);
        let price = resolved.map_or(product.price, |v| v.price);

        let options = display_order(&product.options)
            .into_iter()
            .map(|option| OptionBlock {
                label: option.name.clone(),
                slot: option.slot,
                selector: selector_for(option, selection.get(option.slot), ui),
            })
            .collect();

        PopupView {
            title: product.title.clone(),
            featured_image: product.featured_image.clone(),
            price: format_price(price),
            description: truncate_description(&product.description),
            options,
            purchase: PurchaseControl {
                disabled: resolved.is_none() || ui.loading,
                loading: ui.loading,
            },
            resolved_variant_id: resolved.map(|v| v.id),
        }
    }

    /// Block labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|b| b.label.as_str())
    }
}

/// Color options first; everything else keeps its relative order.
fn display_order(options: &[ProductOption]) -> Vec<&ProductOption> {
    let mut sorted: Vec<&ProductOption> = options.iter().collect();
    sorted.sort_by_key(|o| o.kind() != OptionKind::Color);
    sorted
}

fn selector_for(option: &ProductOption, current: &str, ui: UiState) -> Selector {
    match option.kind() {
        OptionKind::Size => {
            let mut entries = Vec::with_capacity(option.values.len() + 1);
            entries.push(DropdownEntry {
                value: String::new(),
                label: SIZE_PLACEHOLDER.to_string(),
                selected: current.is_empty(),
            });
            entries.extend(option.values.iter().map(|v| DropdownEntry {
                value: v.name.clone(),
                label: v.name.clone(),
                selected: v.name == current,
            }));
            Selector::Dropdown {
                entries,
                open: ui.open_dropdown == Some(option.slot),
            }
        }
        kind => Selector::Buttons(
            option
                .values
                .iter()
                .map(|v| ValueButton {
                    value: v.name.clone(),
                    selected: v.name == current,
                    fill: (kind == OptionKind::Color).then(|| SwatchFill::for_value(v)),
                })
                .collect(),
        ),
    }
}
