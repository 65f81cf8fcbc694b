//! The config data model.
//!
//! A [`Config`] is an ordered string-keyed mapping whose values form a closed
//! set of shapes: scalars, sequences and nested mappings. Key order is kept
//! for serialization only; equality ignores it.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atomic;
use crate::error::{TemplateError, TemplateResult};

/// A single config value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers beyond the signed range
    Unsigned(u64),
    Float(f64),
    String(String),
    Sequence(Vec<ConfigValue>),
    Mapping(Config),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Config> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Unsigned(u) => write!(f, "{}", u),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => f.write_str(s),
            Self::Sequence(_) | Self::Mapping(_) => {
                let yaml = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(yaml.trim_end())
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Unsigned(value), Self::Integer)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Config> for ConfigValue {
    fn from(value: Config) -> Self {
        Self::Mapping(value)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(values: Vec<T>) -> Self {
        Self::Sequence(values.into_iter().map(Into::into).collect())
    }
}

/// A string-keyed mapping of config values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(IndexMap<String, ConfigValue>);

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.0.get_mut(key)
    }

    /// Insert a value, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Look up a value by a dotted key path such as `devcontainer.feature.desktop_lite`.
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    /// Set a value by dotted key path, creating intermediate mappings.
    ///
    /// Intermediate values that are not mappings are replaced.
    pub fn set_path(&mut self, path: &str, value: impl Into<ConfigValue>) {
        match path.split_once('.') {
            None => {
                self.insert(path, value);
            }
            Some((head, rest)) => {
                let entry = self
                    .0
                    .entry(head.to_string())
                    .or_insert_with(|| ConfigValue::Mapping(Config::new()));
                if !entry.is_mapping() {
                    *entry = ConfigValue::Mapping(Config::new());
                }
                if let ConfigValue::Mapping(child) = entry {
                    child.set_path(rest, value);
                }
            }
        }
    }

    /// Parse YAML text into a config.
    ///
    /// Returns `Ok(None)` for an empty document. `origin` only labels errors.
    pub fn from_yaml_str(text: &str, origin: &Path) -> TemplateResult<Option<Self>> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| TemplateError::malformed(origin, e.to_string()))?;

        match value {
            serde_yaml::Value::Null => Ok(None),
            serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value).map(Some).map_err(|e| {
                TemplateError::malformed(
                    origin,
                    format!("unsupported value (keys must be strings, integers must fit in 64 bits): {}", e),
                )
            }),
            other => Err(TemplateError::malformed(
                origin,
                format!("expected a mapping at the top level, found {}", yaml_kind(&other)),
            )),
        }
    }

    /// Load a config file. An absent file is a [`TemplateError::MissingFile`].
    pub fn load(path: &Path) -> TemplateResult<Option<Self>> {
        debug!("Loading config from {:?}", path);
        if !path.exists() {
            return Err(TemplateError::MissingFile(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|e| TemplateError::io(path, e))?;
        Self::from_yaml_str(&text, path)
    }

    pub fn to_yaml_string(&self) -> TemplateResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the config as YAML, replacing the file atomically.
    pub fn save(&self, path: &Path) -> TemplateResult<()> {
        debug!("Writing config to {:?}", path);
        let content = self.to_yaml_string()?;
        atomic::write(path, content.as_bytes(), None)
    }
}

impl FromIterator<(String, ConfigValue)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Config {
    type Item = (String, ConfigValue);
    type IntoIter = indexmap::map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
