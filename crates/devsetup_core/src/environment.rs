//! Supported target environments.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A target environment with its own default-config template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    RosNoetic,
    #[default]
    RosHumble,
    Debian,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Self::RosNoetic, Self::RosHumble, Self::Debian];

    /// The identifier used in config files and template names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RosNoetic => "ros.noetic",
            Self::RosHumble => "ros.humble",
            Self::Debian => "debian",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == s.trim())
            .ok_or_else(|| CoreError::UnknownEnvironment(s.to_string()))
    }
}
