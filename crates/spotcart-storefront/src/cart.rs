//! The cart UI that reflects a successful add.
//!
//! Both capabilities are optional. A collaborator that does not override
//! [`CartCollaborator::sections_to_render`] gets a plain add request; one that
//! does gets its sections rendered server-side in the same round trip.

use serde_json::Value;

/// A cart section the storefront should render alongside the add response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRef {
    pub id: String,
}

impl SectionRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

pub trait CartCollaborator: Send + Sync {
    /// Sections to render with the add request. `None` means the collaborator
    /// has no such capability; `Some(vec![])` still asks for section rendering.
    fn sections_to_render(&self) -> Option<Vec<SectionRef>> {
        None
    }

    /// Refreshes the cart from a successful add response.
    fn render_contents(&self, _response: &Value) {}
}

/// Collaborator with neither capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCart;

impl CartCollaborator for NoCart {}
