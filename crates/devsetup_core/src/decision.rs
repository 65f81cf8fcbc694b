//! Conflict resolution between persisted and freshly supplied values.

use devsetup_templates::ConfigValue;

use crate::error::CoreResult;

/// Decides which value wins when the override file and the caller disagree.
///
/// Only called when `current != proposed`.
#[cfg_attr(test, mockall::automock)]
pub trait ConflictResolver {
    fn resolve(
        &mut self,
        field: &str,
        current: &ConfigValue,
        proposed: &ConfigValue,
    ) -> CoreResult<ConfigValue>;
}

/// Always takes the proposed value.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoAccept;

impl ConflictResolver for AutoAccept {
    fn resolve(&mut self, _field: &str, _current: &ConfigValue, proposed: &ConfigValue) -> CoreResult<ConfigValue> {
        Ok(proposed.clone())
    }
}

/// Always keeps the current value.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepCurrent;

impl ConflictResolver for KeepCurrent {
    fn resolve(&mut self, _field: &str, current: &ConfigValue, _proposed: &ConfigValue) -> CoreResult<ConfigValue> {
        Ok(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_strategies() {
        let current = ConfigValue::from("old_name");
        let proposed = ConfigValue::from("new_name");

        assert_eq!(AutoAccept.resolve("package_name", &current, &proposed).unwrap(), proposed);
        assert_eq!(KeepCurrent.resolve("package_name", &current, &proposed).unwrap(), current);
    }
}
