//! Cross-sell rules: adding one product to the cart can pull in another.
//!
//! Rules are loaded from a YAML file:
//!
//! ```yaml
//! cross_sell:
//!   - handle: soft-winter-jacket
//!     color: black
//!     size: medium
//! ```
//!
//! Without a file, [`RulesFile::default`] carries the single built-in rule.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fires when the purchased variant's color and size match, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossSellRule {
    /// Storefront handle of the product to add.
    pub handle: String,
    pub color: String,
    pub size: String,
}

impl CrossSellRule {
    /// Whether a variant with these color and size values triggers this rule.
    #[must_use]
    pub fn matches(&self, color: &str, size: &str) -> bool {
        color.eq_ignore_ascii_case(&self.color) && size.eq_ignore_ascii_case(&self.size)
    }
}

impl Default for CrossSellRule {
    fn default() -> Self {
        Self {
            handle: "soft-winter-jacket".to_string(),
            color: "black".to_string(),
            size: "medium".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub cross_sell: Vec<CrossSellRule>,
}

impl Default for RulesFile {
    fn default() -> Self {
        Self {
            cross_sell: vec![CrossSellRule::default()],
        }
    }
}

impl RulesFile {
    /// First rule matching the given color and size, in file order.
    #[must_use]
    pub fn find_cross_sell(&self, color: &str, size: &str) -> Option<&CrossSellRule> {
        self.cross_sell.iter().find(|r| r.matches(color, size))
    }
}

/// Load and validate cross-sell rules from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<RulesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_rules(&content)
}

/// Parse and validate cross-sell rules from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text cannot be parsed or fails validation.
pub fn parse_rules(content: &str) -> Result<RulesFile, ConfigError> {
    let rules: RulesFile = serde_yaml::from_str(content)?;
    validate_rules(&rules)?;
    Ok(rules)
}

fn validate_rules(rules: &RulesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for rule in &rules.cross_sell {
        for (field, value) in [
            ("handle", &rule.handle),
            ("color", &rule.color),
            ("size", &rule.size),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "cross-sell rule has an empty {field}"
                )));
            }
        }

        let key = (rule.color.to_lowercase(), rule.size.to_lowercase());
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate cross-sell trigger: color '{}', size '{}'",
                rule.color, rule.size
            )));
        }
    }

    Ok(())
}
