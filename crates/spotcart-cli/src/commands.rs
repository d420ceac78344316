//! Command handlers for the CLI.
//!
//! Both commands build a [`Popup`] the same way a page would: decode the
//! hotspot payload, open, then replay the `--select` choices as clicks or
//! dropdown changes depending on how the option renders.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use spotcart_core::markup::render_popup;
use spotcart_core::payload::extract_hotspot_payloads;
use spotcart_core::{AppConfig, OptionKind, Popup, PopupEvent, PurchaseOutcome, RulesFile};
use spotcart_storefront::{
    CartCollaborator, CrossSellResult, PurchaseFlow, SectionRef, StorefrontClient,
};

pub(crate) struct AddArgs<'a> {
    pub payload: &'a Path,
    pub hotspot: usize,
    pub selections: &'a [String],
    pub page_path: &'a str,
    pub sections: &'a [String],
}

/// Splits a `Name=Value` choice. The value may be empty to unset a dropdown.
pub(crate) fn parse_selection(raw: &str) -> anyhow::Result<(&str, &str)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("selection '{raw}' must look like Name=Value"))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("selection '{raw}' has an empty option name");
    }
    Ok((name, value.trim()))
}

/// Picks the raw payload out of `content`: the `index`-th hotspot of an HTML
/// page, or the whole content when it has no hotspot markup.
pub(crate) fn select_payload(content: &str, index: usize) -> anyhow::Result<String> {
    let payloads = extract_hotspot_payloads(content);
    if payloads.is_empty() {
        return Ok(content.trim().to_owned());
    }
    let count = payloads.len();
    payloads
        .into_iter()
        .nth(index)
        .ok_or_else(|| anyhow::anyhow!("hotspot {index} not found; page has {count}"))
}

/// Opens a popup from the payload file and applies `selections` in order.
pub(crate) fn prepare_popup(
    payload_path: &Path,
    hotspot: usize,
    selections: &[String],
    popup: &mut Popup,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(payload_path)
        .with_context(|| format!("failed to read payload file {}", payload_path.display()))?;
    let raw = select_payload(&content, hotspot)?;
    popup
        .open_from_hotspot(&raw)
        .context("failed to decode hotspot product payload")?;

    for choice in selections {
        let (name, value) = parse_selection(choice)?;
        let option = popup
            .product()
            .and_then(|p| p.options.iter().find(|o| o.name == name))
            .map(|o| (o.slot, o.kind()))
            .ok_or_else(|| anyhow::anyhow!("product has no option named '{name}'"))?;

        let event = match option {
            (slot, OptionKind::Size) => PopupEvent::DropdownChanged {
                slot,
                value: value.to_owned(),
            },
            _ => PopupEvent::ValueClicked {
                label: name.to_owned(),
                value: value.to_owned(),
            },
        };
        popup.handle(event);
    }

    Ok(())
}

pub(crate) fn run_render(
    payload: &Path,
    hotspot: usize,
    selections: &[String],
) -> anyhow::Result<()> {
    let mut popup = Popup::default();
    prepare_popup(payload, hotspot, selections, &mut popup)?;
    let view = popup
        .view()
        .ok_or_else(|| anyhow::anyhow!("popup did not open"))?;
    println!("{}", render_popup(view));
    Ok(())
}

/// Cart collaborator that prints the storefront's add response.
struct StdoutCart {
    sections: Vec<String>,
}

impl CartCollaborator for StdoutCart {
    fn sections_to_render(&self) -> Option<Vec<SectionRef>> {
        if self.sections.is_empty() {
            return None;
        }
        Some(self.sections.iter().map(SectionRef::new).collect())
    }

    fn render_contents(&self, response: &serde_json::Value) {
        match serde_json::to_string_pretty(response) {
            Ok(pretty) => println!("{pretty}"),
            Err(e) => tracing::warn!(error = %e, "could not format cart response"),
        }
    }
}

pub(crate) async fn run_add(config: &AppConfig, args: &AddArgs<'_>) -> anyhow::Result<()> {
    let rules = match &config.rules_path {
        Some(path) => spotcart_core::load_rules(path)?,
        None => RulesFile::default(),
    };

    let mut popup = Popup::new(config.select_close_delay);
    prepare_popup(args.payload, args.hotspot, args.selections, &mut popup)?;

    let client = StorefrontClient::new(
        &config.store_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build storefront client: {e}"))?;
    let cart: Arc<dyn CartCollaborator> = Arc::new(StdoutCart {
        sections: args.sections.to_vec(),
    });
    let flow = PurchaseFlow::new(client, rules)
        .with_cart(cart)
        .with_page_path(args.page_path);

    tracing::info!(env = %config.env, store_url = %config.store_url, "submitting add to cart");
    let report = flow
        .activate_purchase(&mut popup)
        .await
        .ok_or_else(|| anyhow::anyhow!("selection does not resolve to a variant"))?;

    match report.outcome {
        PurchaseOutcome::Added => {
            println!("added variant {} to cart", report.ticket.variant_id);
            if let Some(CrossSellResult::Added { handle, variant_id }) = report.cross_sell {
                println!("cross-sell: added {handle} (variant {variant_id})");
            }
            Ok(())
        }
        PurchaseOutcome::Rejected { message } => {
            anyhow::bail!("add to cart rejected: {message}")
        }
    }
}
