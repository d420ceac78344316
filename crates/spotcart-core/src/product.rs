//! Product snapshot types for hotspot payloads and storefront `.js` lookups.
//!
//! ## Observed payload shapes
//!
//! ### `options`
//! Themes emit options in two shapes. The legacy shape is a bare name string
//! (`["Color", "Size"]`); newer themes emit objects with the declared values
//! and optional swatches:
//!
//! ```json
//! { "name": "Color", "values": [{ "name": "Black", "swatch": { "color": "0 0 0" } }] }
//! ```
//!
//! Both are normalized at ingestion into [`ProductOption`]. For bare strings
//! the value list is derived from the variants' slot fields, keeping the
//! first-seen order. Individual values may also arrive as plain strings.
//!
//! ### `variants[].optionN`
//! One field per option slot, named positionally (`option1`, `option2`, ...).
//! Shopify emits `null` for unused slots; those read back as absent.
//!
//! ### Prices
//! Integer minor currency units (`12345` is `123,45€`).

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::selection::SlotKey;

/// How an option is presented in the popup, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Color,
    Size,
    Other,
}

impl OptionKind {
    /// Classifies an option name. Matching is case-insensitive and exact.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("color") {
            OptionKind::Color
        } else if name.eq_ignore_ascii_case("size") {
            OptionKind::Size
        } else {
            OptionKind::Other
        }
    }
}

/// A product as supplied by a hotspot or fetched from the storefront.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawProduct")]
pub struct Product {
    pub title: String,
    /// Rich-text description; may contain markup.
    pub description: String,
    /// Base price in minor units, shown while no variant is resolved.
    pub price: i64,
    pub featured_image: Option<String>,
    /// Options in declared order. `options[i].slot` is always `option{i+1}`.
    pub options: Vec<ProductOption>,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Returns the first option of the given kind, in declared order.
    #[must_use]
    pub fn find_option(&self, kind: OptionKind) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.kind() == kind)
    }

    /// Maps a displayed option label back to its slot key.
    ///
    /// The lookup is an exact, case-sensitive name match against the declared
    /// option order, so display sorting never shifts slot numbering.
    #[must_use]
    pub fn slot_for_label(&self, label: &str) -> Option<SlotKey> {
        self.options.iter().find(|o| o.name == label).map(|o| o.slot)
    }

    /// Returns the first variant flagged available, in list order.
    #[must_use]
    pub fn first_available_variant(&self) -> Option<&Variant> {
        self.variants.iter().find(|v| v.available)
    }
}

/// One option dimension of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOption {
    pub name: String,
    pub slot: SlotKey,
    pub values: Vec<OptionValue>,
}

impl ProductOption {
    #[must_use]
    pub fn kind(&self) -> OptionKind {
        OptionKind::from_name(&self.name)
    }
}

/// A declared value of a [`ProductOption`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    pub name: String,
    pub swatch: Option<Swatch>,
}

/// Visual swatch attached to an option value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Swatch {
    /// Image URL; takes priority over `color`.
    #[serde(default)]
    pub image: Option<String>,
    /// Channel list such as `"255 0 0"` or `"255,0,0"`.
    #[serde(default)]
    pub color: Option<String>,
}

/// A single purchasable variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawVariant")]
pub struct Variant {
    pub id: u64,
    pub price: i64,
    pub available: bool,
    /// Non-null `optionN` fields keyed by slot. Only present slots are
    /// stored, so an absurd `optionN` key costs one entry.
    option_values: BTreeMap<SlotKey, String>,
}

impl Variant {
    /// Builds a variant from its slot values in positional order.
    #[must_use]
    pub fn new(id: u64, price: i64, available: bool, option_values: Vec<Option<String>>) -> Self {
        let option_values = option_values
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (SlotKey::from_index(i), v)))
            .collect();
        Self {
            id,
            price,
            available,
            option_values,
        }
    }

    /// Returns this variant's value for `slot`, if the field is present and non-null.
    #[must_use]
    pub fn option_value(&self, slot: SlotKey) -> Option<&str> {
        self.option_values.get(&slot).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(default)]
    title: String,
    #[serde(default, alias = "body_html")]
    description: Option<String>,
    #[serde(default)]
    price: i64,
    #[serde(default)]
    featured_image: Option<String>,
    #[serde(default)]
    options: Vec<RawOption>,
    variants: Vec<Variant>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Name(String),
    Structured {
        name: String,
        #[serde(default)]
        values: Vec<RawOptionValue>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOptionValue {
    Name(String),
    Structured {
        name: String,
        #[serde(default)]
        swatch: Option<Swatch>,
    },
}

impl From<RawOptionValue> for OptionValue {
    fn from(raw: RawOptionValue) -> Self {
        match raw {
            RawOptionValue::Name(name) => OptionValue { name, swatch: None },
            RawOptionValue::Structured { name, swatch } => OptionValue { name, swatch },
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    id: u64,
    #[serde(default)]
    price: i64,
    #[serde(default)]
    available: bool,
    #[serde(flatten)]
    fields: BTreeMap<String, serde_json::Value>,
}

impl From<RawVariant> for Variant {
    fn from(raw: RawVariant) -> Self {
        let option_values = raw
            .fields
            .into_iter()
            .filter_map(|(key, value)| {
                let slot = key.parse::<SlotKey>().ok()?;
                value.as_str().map(|v| (slot, v.to_owned()))
            })
            .collect();

        Variant {
            id: raw.id,
            price: raw.price,
            available: raw.available,
            option_values,
        }
    }
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let variants = raw.variants;
        let options = raw
            .options
            .into_iter()
            .enumerate()
            .map(|(index, option)| {
                let slot = SlotKey::from_index(index);
                match option {
                    RawOption::Name(name) => ProductOption {
                        name,
                        slot,
                        values: distinct_slot_values(&variants, slot),
                    },
                    RawOption::Structured { name, values } => ProductOption {
                        name,
                        slot,
                        values: values.into_iter().map(OptionValue::from).collect(),
                    },
                }
            })
            .collect();

        Product {
            title: raw.title,
            description: raw.description.unwrap_or_default(),
            price: raw.price,
            featured_image: raw.featured_image,
            options,
            variants,
        }
    }
}

/// Collects the distinct values of `slot` across `variants`, first-seen order.
fn distinct_slot_values(variants: &[Variant], slot: SlotKey) -> Vec<OptionValue> {
    let mut values: Vec<OptionValue> = Vec::new();
    for name in variants.iter().filter_map(|v| v.option_value(slot)) {
        if !values.iter().any(|existing| existing.name == name) {
            values.push(OptionValue {
                name: name.to_owned(),
                swatch: None,
            });
        }
    }
    values
}

#[cfg(test)]
#[path = "product_test.rs"]
mod tests;
