//! Display formatting for prices, descriptions, and color swatches.

use std::sync::LazyLock;

use regex::Regex;

use crate::payload::decode_html_entities;
use crate::product::OptionValue;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Number of description words shown before the ellipsis.
pub const DESCRIPTION_WORD_LIMIT: usize = 22;

/// Formats minor currency units as `1234,56€`.
///
/// Two fraction digits, decimal comma, no thousands grouping, no space before
/// the euro sign.
#[must_use]
pub fn format_price(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!("{sign}{},{:02}€", abs / 100, abs % 100)
}

/// Strips markup, decodes entities, keeps the first [`DESCRIPTION_WORD_LIMIT`]
/// words and appends `...` whether or not anything was cut. An empty
/// description stays empty.
///
/// The result is plain text; escape it before writing it into markup.
#[must_use]
pub fn truncate_description(description: &str) -> String {
    if description.is_empty() {
        return String::new();
    }
    let stripped = TAG_RE.replace_all(description, "");
    let text = decode_html_entities(&stripped).unwrap_or_else(|_| stripped.into_owned());
    let words: Vec<&str> = text
        .split_whitespace()
        .take(DESCRIPTION_WORD_LIMIT)
        .collect();
    format!("{}...", words.join(" "))
}

/// Visual fill for a color swatch button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwatchFill {
    /// Background image URL.
    Image(String),
    /// Comma-separated channel triple for `rgb(...)`.
    Rgb(String),
    /// Lower-cased value name used as a CSS color keyword.
    Keyword(String),
}

impl SwatchFill {
    /// Picks the fill for `value`: image swatch, then color swatch, then the
    /// lower-cased value name.
    #[must_use]
    pub fn for_value(value: &OptionValue) -> Self {
        let swatch = value.swatch.as_ref();
        if let Some(image) = swatch.and_then(|s| s.image.as_deref()) {
            return SwatchFill::Image(image.to_owned());
        }
        if let Some(color) = swatch.and_then(|s| s.color.as_deref()) {
            return SwatchFill::Rgb(normalize_channels(color));
        }
        SwatchFill::Keyword(value.name.to_lowercase())
    }

    /// Inline CSS declarations for this fill.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            SwatchFill::Image(url) => {
                format!("background-image: url({url}); background-size: cover;")
            }
            SwatchFill::Rgb(channels) => format!("background-color: rgb({channels});"),
            SwatchFill::Keyword(keyword) => format!("background-color: {keyword};"),
        }
    }
}

/// `"255 0 0"` becomes `"255,0,0"`; values that already contain commas pass through.
fn normalize_channels(color: &str) -> String {
    if color.contains(',') {
        color.to_owned()
    } else {
        color.split_whitespace().collect::<Vec<_>>().join(",")
    }
}
