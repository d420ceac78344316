//! Hotspot payload decoding.
//!
//! A hotspot carries its product as JSON inside an HTML attribute, so quotes
//! and ampersands arrive entity-encoded (`{&quot;title&quot;:...}`). Entities
//! are decoded first, then the JSON is parsed into a [`Product`].

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::product::Product;

static HOTSPOT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<[a-z][^>]*\bdata-hotspot\b[^>]*>").expect("valid regex")
});
static PRODUCT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bdata-product\s*=\s*"([^"]*)""#).expect("valid regex")
});
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("valid regex")
});

/// Decodes named and numeric HTML character references.
///
/// Unknown named entities are left as written, the way browsers treat them.
///
/// # Errors
///
/// Returns [`CoreError::PayloadDecode`] for a numeric reference that is not a
/// valid Unicode scalar value.
pub fn decode_html_entities(raw: &str) -> Result<String, CoreError> {
    let mut out = String::with_capacity(raw.len());
    let mut last = 0usize;

    for cap in ENTITY_RE.captures_iter(raw) {
        let (Some(whole), Some(body)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        out.push_str(&raw[last..whole.start()]);
        last = whole.end();

        let body = body.as_str();
        if let Some(numeric) = body.strip_prefix('#') {
            out.push(decode_numeric(numeric)?);
            continue;
        }
        match named_entity(body) {
            Some(c) => out.push(c),
            None => out.push_str(whole.as_str()),
        }
    }

    out.push_str(&raw[last..]);
    Ok(out)
}

fn decode_numeric(numeric: &str) -> Result<char, CoreError> {
    let parsed = match numeric.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => numeric.parse::<u32>(),
    };
    parsed
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| CoreError::PayloadDecode {
            reason: format!("invalid character reference &#{numeric};"),
        })
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "lt" => '<',
        "gt" => '>',
        "nbsp" => '\u{a0}',
        "euro" => '€',
        "copy" => '©',
        "reg" => '®',
        "hellip" => '…',
        "ndash" => '–',
        "mdash" => '—',
        _ => return None,
    };
    Some(c)
}

/// Decodes a hotspot's `data-product` attribute into a [`Product`].
///
/// # Errors
///
/// Returns [`CoreError::PayloadDecode`] when entity decoding fails, the JSON is
/// malformed, or the product lacks a `variants` list.
pub fn decode_product_payload(raw: &str) -> Result<Product, CoreError> {
    let decoded = decode_html_entities(raw)?;
    serde_json::from_str::<Product>(&decoded).map_err(|e| CoreError::PayloadDecode {
        reason: e.to_string(),
    })
}

/// Collects the raw `data-product` values of every hotspot element in `html`.
///
/// Hotspots without a product attribute are skipped, matching a click on a
/// marker that carries no payload.
#[must_use]
pub fn extract_hotspot_payloads(html: &str) -> Vec<String> {
    HOTSPOT_TAG_RE
        .find_iter(html)
        .filter_map(|tag| {
            PRODUCT_ATTR_RE
                .captures(tag.as_str())
                .and_then(|cap| cap.get(1).map(|m| m.as_str().to_owned()))
        })
        .collect()
}
