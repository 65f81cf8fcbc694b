//! Caller-supplied values for a setup run.

use crate::environment::Environment;

/// Package name used when the caller does not supply one.
pub const DEFAULT_PACKAGE_NAME: &str = "new_package";

/// Values supplied by whoever invokes the setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupRequest {
    /// Requested package name; the placeholder means "not supplied"
    pub package_name: String,
    /// Explicit environment, `None` to infer
    pub environment: Option<Environment>,
    /// Enable the lightweight desktop feature in the devcontainer
    pub desktop_lite: bool,
}

impl Default for SetupRequest {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            environment: None,
            desktop_lite: false,
        }
    }
}

impl SetupRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    pub fn environment(mut self, env: Environment) -> Self {
        self.environment = Some(env);
        self
    }

    pub fn desktop_lite(mut self, enabled: bool) -> Self {
        self.desktop_lite = enabled;
        self
    }

    /// The package name, unless it is still the placeholder.
    pub fn explicit_package_name(&self) -> Option<&str> {
        Some(self.package_name.as_str()).filter(|name| *name != DEFAULT_PACKAGE_NAME)
    }
}
