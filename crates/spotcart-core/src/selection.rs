//! Option selection state and variant resolution.
//!
//! A [`Selection`] holds one value per option slot. The empty string means
//! "unset", which is only expected for the size slot. A variant resolves only
//! when every slot is set and all of them match that variant's fields.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::product::{OptionKind, Product, Variant};

/// Positional slot key, rendered as `option1`, `option2`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey(usize);

impl SlotKey {
    /// Slot for the option at zero-based `index`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        SlotKey(index)
    }

    /// Zero-based index into the product's option list.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option{}", self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSlotKeyError(String);

impl fmt::Display for ParseSlotKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" is not a slot key (expected optionN, N >= 1)", self.0)
    }
}

impl std::error::Error for ParseSlotKeyError {}

impl FromStr for SlotKey {
    type Err = ParseSlotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("option")
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .map(|n| SlotKey(n - 1))
            .ok_or_else(|| ParseSlotKeyError(s.to_owned()))
    }
}

/// Selected value per slot for one open popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    slots: Vec<String>,
}

impl Selection {
    /// Seeds a selection from the product's first variant.
    ///
    /// The size slot starts unset; every other slot takes the first variant's
    /// value (or unset when that field is missing).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoVariants`] when the product has no variants. The
    /// caller keeps an empty selection in that case.
    pub fn initialize(product: &Product) -> Result<Self, CoreError> {
        let Some(first) = product.variants.first() else {
            return Err(CoreError::NoVariants {
                title: product.title.clone(),
            });
        };

        let slots = product
            .options
            .iter()
            .map(|option| {
                if option.kind() == OptionKind::Size {
                    String::new()
                } else {
                    first
                        .option_value(option.slot)
                        .map(str::to_owned)
                        .unwrap_or_default()
                }
            })
            .collect();

        Ok(Self { slots })
    }

    /// Overwrites one slot. The value is not checked against the declared values.
    ///
    /// Slots the product does not declare are ignored.
    pub fn set(&mut self, slot: SlotKey, value: impl Into<String>) {
        match self.slots.get_mut(slot.index()) {
            Some(current) => *current = value.into(),
            None => {
                tracing::warn!(slot = %slot, declared = self.slots.len(), "ignoring value for undeclared slot");
            }
        }
    }

    /// Current value of `slot`; empty when unset or unknown.
    #[must_use]
    pub fn get(&self, slot: SlotKey) -> &str {
        self.slots.get(slot.index()).map_or("", String::as_str)
    }

    /// Iterates `(slot, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, &str)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, v)| (SlotKey::from_index(i), v.as_str()))
    }

    /// Returns the first variant matching every slot, or `None` when any slot
    /// is unset or no variant matches all of them.
    #[must_use]
    pub fn resolve<'a>(&self, variants: &'a [Variant]) -> Option<&'a Variant> {
        if self.slots.iter().any(String::is_empty) {
            return None;
        }
        variants.iter().find(|variant| {
            self.iter()
                .all(|(slot, value)| variant.option_value(slot) == Some(value))
        })
    }
}
