//! Popup session controller.
//!
//! Owns the open product, its [`Selection`], transient UI state and the
//! retained [`PopupView`]. All input arrives as a [`PopupEvent`]; every
//! handled event that touches state rebuilds the view before returning, so
//! the purchase control can never reflect a stale resolution.
//!
//! Purchases are split in two synchronous halves around the network call:
//! [`Popup::begin_purchase`] marks the control loading and hands out a
//! [`PurchaseTicket`]; [`Popup::finish_purchase`] applies the outcome. Each
//! [`Popup::open`] bumps a session generation. An outcome for an older
//! generation is dropped, and an outcome arriving after close never re-opens
//! the popup.

use std::time::{Duration, Instant};

use crate::error::CoreError;
use crate::payload::decode_product_payload;
use crate::product::{OptionKind, Product};
use crate::selection::{Selection, SlotKey};
use crate::view::{PopupView, UiState};

/// Default delay between a dropdown losing focus and its "open" class clearing.
pub const DEFAULT_DROPDOWN_CLOSE_DELAY: Duration = Duration::from_millis(200);

/// Discrete input delivered to the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEvent {
    /// A value button inside the option block labelled `label` was clicked.
    ValueClicked { label: String, value: String },
    /// The dropdown of `slot` changed; an empty value means "unset".
    DropdownChanged { slot: SlotKey, value: String },
    DropdownFocused { slot: SlotKey },
    DropdownBlurred { slot: SlotKey, at: Instant },
    /// Timer tick used to apply deferred dropdown closing.
    Tick { now: Instant },
    /// Page-wide key press; `"Escape"` closes the popup.
    KeyPressed { key: String },
    CloseRequested,
    /// Click on the backdrop itself, not on the content.
    OverlayClicked,
    NoticeDismissed,
}

/// Where the purchase control is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseState {
    Idle,
    Submitting,
}

/// Color and size of the purchased variant, present only when the product
/// declares both options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossSellKey {
    pub color: String,
    pub size: String,
}

/// Everything the network half of a purchase needs, detached from the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseTicket {
    pub generation: u64,
    pub variant_id: u64,
    pub cross_sell: Option<CrossSellKey>,
}

/// Result of the add-to-cart request as seen by the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Added,
    Rejected { message: String },
}

#[derive(Debug, Clone)]
struct Session {
    product: Product,
    selection: Selection,
    view: PopupView,
}

#[derive(Debug)]
pub struct Popup {
    session: Option<Session>,
    open: bool,
    generation: u64,
    ui: UiState,
    dropdown_close_at: Option<Instant>,
    close_delay: Duration,
    notice: Option<String>,
}

impl Default for Popup {
    fn default() -> Self {
        Self::new(DEFAULT_DROPDOWN_CLOSE_DELAY)
    }
}

impl Popup {
    #[must_use]
    pub fn new(close_delay: Duration) -> Self {
        Self {
            session: None,
            open: false,
            generation: 0,
            ui: UiState::default(),
            dropdown_close_at: None,
            close_delay,
            notice: None,
        }
    }

    /// Opens the popup for `product` with a fresh selection.
    pub fn open(&mut self, product: Product) {
        let selection = Selection::initialize(&product).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "opening popup with an empty selection");
            Selection::default()
        });

        self.generation += 1;
        self.ui = UiState::default();
        self.dropdown_close_at = None;
        self.notice = None;
        self.open = true;

        let view = PopupView::build(&product, &selection, self.ui);
        tracing::debug!(
            generation = self.generation,
            title = %product.title,
            variants = product.variants.len(),
            "popup opened"
        );
        self.session = Some(Session {
            product,
            selection,
            view,
        });
    }

    /// Decodes a hotspot's product payload and opens the popup.
    ///
    /// On failure the error is logged and the popup is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PayloadDecode`] if the payload cannot be decoded.
    pub fn open_from_hotspot(&mut self, raw_payload: &str) -> Result<(), CoreError> {
        match decode_product_payload(raw_payload) {
            Ok(product) => {
                self.open(product);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "error parsing hotspot product data");
                Err(e)
            }
        }
    }

    /// Closes the popup and discards the selection. An in-flight purchase
    /// still runs to completion.
    pub fn close(&mut self) {
        if self.open {
            tracing::debug!(generation = self.generation, "popup closed");
        }
        self.open = false;
        self.session = None;
        self.ui.open_dropdown = None;
        self.dropdown_close_at = None;
        self.notice = None;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current view, present while the popup is open.
    #[must_use]
    pub fn view(&self) -> Option<&PopupView> {
        self.session.as_ref().map(|s| &s.view)
    }

    #[must_use]
    pub fn product(&self) -> Option<&Product> {
        self.session.as_ref().map(|s| &s.product)
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.session.as_ref().map(|s| &s.selection)
    }

    /// Blocking notice from the last rejected purchase, until dismissed.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn purchase_state(&self) -> PurchaseState {
        if self.ui.loading {
            PurchaseState::Submitting
        } else {
            PurchaseState::Idle
        }
    }

    /// Sets one slot and re-renders.
    pub fn select(&mut self, slot: SlotKey, value: impl Into<String>) {
        if let Some(session) = self.session.as_mut() {
            session.selection.set(slot, value);
        }
        self.rerender();
    }

    pub fn handle(&mut self, event: PopupEvent) {
        match event {
            PopupEvent::ValueClicked { label, value } => {
                let slot = self.product().and_then(|p| p.slot_for_label(&label));
                match slot {
                    Some(slot) => self.select(slot, value),
                    None => {
                        tracing::warn!(label = %label, "click on an option block with no matching option");
                    }
                }
            }
            PopupEvent::DropdownChanged { slot, value } => self.select(slot, value),
            PopupEvent::DropdownFocused { slot } => {
                self.ui.open_dropdown = Some(slot);
                self.dropdown_close_at = None;
                self.rerender();
            }
            PopupEvent::DropdownBlurred { slot, at } => {
                self.ui.open_dropdown = Some(slot);
                self.dropdown_close_at = Some(at + self.close_delay);
                self.rerender();
            }
            PopupEvent::Tick { now } => {
                if self.dropdown_close_at.is_some_and(|deadline| deadline <= now) {
                    self.dropdown_close_at = None;
                    self.ui.open_dropdown = None;
                    self.rerender();
                }
            }
            PopupEvent::KeyPressed { key } => {
                if key == "Escape" {
                    self.close();
                }
            }
            PopupEvent::CloseRequested | PopupEvent::OverlayClicked => self.close(),
            PopupEvent::NoticeDismissed => self.notice = None,
        }
    }

    /// Enters `Submitting` for the resolved variant.
    ///
    /// Returns `None` when the popup is closed, nothing is resolved, or a
    /// purchase is already in flight.
    pub fn begin_purchase(&mut self) -> Option<PurchaseTicket> {
        if !self.open || self.ui.loading {
            return None;
        }
        let session = self.session.as_ref()?;
        let variant = session.selection.resolve(&session.product.variants)?;

        let product = &session.product;
        let cross_sell = match (
            product.find_option(OptionKind::Color),
            product.find_option(OptionKind::Size),
        ) {
            (Some(color), Some(size)) => {
                match (variant.option_value(color.slot), variant.option_value(size.slot)) {
                    (Some(c), Some(s)) => Some(CrossSellKey {
                        color: c.to_owned(),
                        size: s.to_owned(),
                    }),
                    _ => None,
                }
            }
            _ => None,
        };

        let ticket = PurchaseTicket {
            generation: self.generation,
            variant_id: variant.id,
            cross_sell,
        };

        self.ui.loading = true;
        self.rerender();
        tracing::debug!(
            generation = ticket.generation,
            variant_id = ticket.variant_id,
            "purchase submitting"
        );
        Some(ticket)
    }

    /// Applies a purchase outcome and always clears the loading state of the
    /// session that issued `ticket`.
    pub fn finish_purchase(&mut self, ticket: &PurchaseTicket, outcome: PurchaseOutcome) {
        if ticket.generation != self.generation {
            tracing::info!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                ?outcome,
                "purchase finished for a previous popup session; result not shown"
            );
            return;
        }

        self.ui.loading = false;

        match outcome {
            PurchaseOutcome::Added => {
                if self.open {
                    self.close();
                }
            }
            PurchaseOutcome::Rejected { message } => {
                if self.open {
                    self.notice = Some(message);
                } else {
                    tracing::warn!(message = %message, "purchase rejected after the popup was closed");
                }
            }
        }
        self.rerender();
    }

    fn rerender(&mut self) {
        let ui = self.ui;
        if let Some(session) = self.session.as_mut() {
            session.view = PopupView::build(&session.product, &session.selection, ui);
        }
    }
}

#[cfg(test)]
#[path = "popup_test.rs"]
mod tests;
