//! HTML projection of a [`PopupView`].
//!
//! Class names and the `disabled` attribute are what the theme stylesheet
//! keys on. Option blocks carry `data-option-key` so a delegated handler can
//! route events without rebinding listeners after each render.

use std::fmt::Write as _;

use crate::view::{OptionBlock, PopupView, Selector};

const ARROW_SVG: &str = r#"<svg width="27" height="12" viewBox="0 0 27 12" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M0.75 4.77L26.26 4.77L26.26 6.27L0.75 6.27Z M20.95 0.22L26.79 5.52L20.95 10.83" fill="white"/></svg>"#;
const CHEVRON_SVG: &str = r#"<svg viewBox="0 0 14 10" fill="none" width="14" height="10"><path d="M1 1L7 7L13 1" stroke="currentColor" stroke-width="2"/></svg>"#;

/// Escapes text for use in element content and double-quoted attributes.
#[must_use]
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the popup content markup.
#[must_use]
pub fn render_popup(view: &PopupView) -> String {
    let mut html = String::new();
    let title = escape_html(&view.title);

    html.push_str(r#"<div class="product-popup__header">"#);
    html.push_str(r#"<div class="product-popup__media">"#);
    if let Some(src) = &view.featured_image {
        let _ = write!(html, r#"<img src="{}" alt="{title}">"#, escape_html(src));
    }
    html.push_str("</div>");
    html.push_str(r#"<div class="product-popup__info-head">"#);
    let _ = write!(html, r#"<h2 class="product-popup__title">{title}</h2>"#);
    let _ = write!(
        html,
        r#"<div class="product-popup__price">{}</div>"#,
        escape_html(&view.price)
    );
    let _ = write!(
        html,
        r#"<div class="product-popup__description">{}</div>"#,
        escape_html(&view.description)
    );
    html.push_str("</div></div>");

    html.push_str(r#"<div class="variant-selectors">"#);
    for block in &view.options {
        render_block(&mut html, block);
    }
    html.push_str("</div>");

    let mut classes = String::from("add-to-cart-btn");
    if view.purchase.loading {
        classes.push_str(" loading");
    }
    let disabled = if view.purchase.disabled { " disabled" } else { "" };
    let _ = write!(
        html,
        r#"<button class="{classes}"{disabled}><span class="btn-text">ADD TO CART</span><div class="arrow-svg">{ARROW_SVG}</div><div class="loading-overlay"></div></button>"#
    );

    html
}

fn render_block(html: &mut String, block: &OptionBlock) {
    let _ = write!(
        html,
        r#"<div class="variant-option" data-option-key="{}"><span class="variant-option__label">{}</span>"#,
        block.slot,
        escape_html(&block.label)
    );

    match &block.selector {
        Selector::Dropdown { entries, open } => {
            let open_class = if *open { " open" } else { "" };
            let _ = write!(
                html,
                r#"<div class="variant-option__select-wrapper{open_class}" data-option-key="{}"><select class="variant-option__select">"#,
                block.slot
            );
            for entry in entries {
                let selected = if entry.selected { " selected" } else { "" };
                let _ = write!(
                    html,
                    r#"<option value="{}"{selected}>{}</option>"#,
                    escape_html(&entry.value),
                    escape_html(&entry.label)
                );
            }
            let _ = write!(
                html,
                r#"</select><div class="variant-option__select-icon">{CHEVRON_SVG}</div></div>"#
            );
        }
        Selector::Buttons(buttons) => {
            html.push_str(r#"<div class="variant-option__values">"#);
            for button in buttons {
                let selected = if button.selected { " selected" } else { "" };
                let value = escape_html(&button.value);
                let _ = write!(
                    html,
                    r#"<div class="variant-option__value{selected}" data-value="{value}">"#
                );
                if let Some(fill) = &button.fill {
                    let _ = write!(
                        html,
                        r#"<span class="variant-option__color-bar" style="{}"></span>"#,
                        escape_html(&fill.css())
                    );
                }
                let _ = write!(html, "{value}</div>");
            }
            html.push_str("</div>");
        }
    }

    html.push_str("</div>");
}
