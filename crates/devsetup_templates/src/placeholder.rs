//! Removal of unresolved template placeholders from configs.
//!
//! Default-config templates declare values such as `"{{ args.package_name }}"`
//! that have no environment-level default. Until a real value arrives those
//! keys must be absent, not empty.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::{Config, ConfigValue};

// Matches a jinja expression or statement delimiter pair.
static TEMPLATE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{.*?\}\}|\{%.*?%\}").expect("valid marker pattern"));

/// Whether a string still carries template syntax.
pub fn is_unresolved(value: &str) -> bool {
    TEMPLATE_MARKER.is_match(value)
}

/// Drop every key whose value is an unresolved template string.
///
/// Nested mappings are stripped recursively and kept even when they end up
/// empty. Unresolved strings inside sequences are dropped from the sequence.
pub fn strip_unresolved(config: &Config) -> Config {
    config
        .iter()
        .filter_map(|(key, value)| match strip_value(value) {
            Some(kept) => Some((key.clone(), kept)),
            None => {
                debug!("Removing unresolved placeholder '{}' = {}", key, value);
                None
            }
        })
        .collect()
}

/// Dotted paths of every unresolved string in `config`.
///
/// Sequence elements are reported as `key[index]`.
pub fn unresolved_paths(config: &Config) -> Vec<String> {
    let mut found = Vec::new();
    for (key, value) in config.iter() {
        collect_unresolved(key, value, &mut found);
    }
    found
}

fn collect_unresolved(path: &str, value: &ConfigValue, found: &mut Vec<String>) {
    match value {
        ConfigValue::String(s) if is_unresolved(s) => found.push(path.to_string()),
        ConfigValue::Mapping(m) => {
            for (key, child) in m.iter() {
                collect_unresolved(&format!("{}.{}", path, key), child, found);
            }
        }
        ConfigValue::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_unresolved(&format!("{}[{}]", path, index), item, found);
            }
        }
        _ => {}
    }
}

fn strip_value(value: &ConfigValue) -> Option<ConfigValue> {
    match value {
        ConfigValue::String(s) if is_unresolved(s) => None,
        ConfigValue::Mapping(m) => Some(ConfigValue::Mapping(strip_unresolved(m))),
        ConfigValue::Sequence(items) => Some(ConfigValue::Sequence(
            items.iter().filter_map(strip_value).collect(),
        )),
        other => Some(other.clone()),
    }
}
