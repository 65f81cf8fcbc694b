//! Deep merge of configs.
//!
//! Merge semantics:
//! - Mappings: merged key by key, recursively
//! - Sequences: replaced wholesale (overlay wins)
//! - Scalars: overlay wins

use crate::config::{Config, ConfigValue};

/// Merge `overlay` over `base`, returning a new config.
///
/// Neither argument is modified, so one base can feed several merges.
pub fn merge(base: &Config, overlay: &Config) -> Config {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay.clone());
    merged
}

/// Merge config layers in order; later layers take precedence.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Config>) -> Config {
    layers
        .into_iter()
        .fold(Config::new(), |acc, layer| merge(&acc, layer))
}

fn merge_into(base: &mut Config, overlay: Config) {
    for (key, overlay_value) in overlay {
        let merged = match (base.remove_in_place(&key), overlay_value) {
            (Some(ConfigValue::Mapping(mut base_map)), ConfigValue::Mapping(overlay_map)) => {
                merge_into(&mut base_map, overlay_map);
                ConfigValue::Mapping(base_map)
            }
            (_, overlay_value) => overlay_value,
        };
        base.insert(key, merged);
    }
}

impl Config {
    /// Take a value out while keeping its slot, so a reinsert keeps key order.
    fn remove_in_place(&mut self, key: &str) -> Option<ConfigValue> {
        self.get_mut(key).map(|slot| std::mem::replace(slot, ConfigValue::Null))
    }
}
