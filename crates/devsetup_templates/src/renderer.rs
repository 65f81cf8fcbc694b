//! Template rendering against a config.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};

use crate::config::Config;
use crate::error::{TemplateError, TemplateResult};

/// Name under which the whole config is exposed to templates.
pub const DEFAULT_BINDING: &str = "args";

/// Renders template text and path names with a single config binding.
///
/// Undefined references are errors, never empty strings.
pub struct TemplateRenderer {
    env: Environment<'static>,
    binding: String,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a renderer exposing the config as `args`.
    pub fn new() -> Self {
        Self::with_binding(DEFAULT_BINDING)
    }

    /// Create a renderer exposing the config under a custom name.
    pub fn with_binding(binding: impl Into<String>) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        // Values are substituted verbatim whatever the file extension.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self {
            env,
            binding: binding.into(),
        }
    }

    pub fn binding(&self) -> &str {
        &self.binding
    }

    /// Render template text.
    pub fn render(&self, template_text: &str, context: &Config) -> TemplateResult<String> {
        self.render_named("<inline>", template_text, context)
    }

    /// Render template text; `name` labels errors.
    pub fn render_named(
        &self,
        name: &str,
        template_text: &str,
        context: &Config,
    ) -> TemplateResult<String> {
        self.env
            .render_named_str(name, template_text, self.context(context))
            .map_err(|e| classify(name, e))
    }

    /// Read and render a template file.
    pub fn render_file(&self, path: &Path, context: &Config) -> TemplateResult<String> {
        if !path.exists() {
            return Err(TemplateError::MissingFile(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|e| TemplateError::io(path, e))?;
        self.render_named(&path.display().to_string(), &text, context)
    }

    /// Render one path component.
    pub fn render_segment(&self, segment: &str, context: &Config) -> TemplateResult<String> {
        self.render_named(segment, segment, context)
    }

    /// Render every component of a relative path on its own and rejoin them.
    pub fn render_path(&self, relative: &Path, context: &Config) -> TemplateResult<PathBuf> {
        let mut rendered = PathBuf::new();
        for component in relative.components() {
            let segment = match component {
                Component::Normal(os) => os.to_str().ok_or_else(|| invalid(relative, os.to_string_lossy()))?,
                other => return Err(invalid(relative, other.as_os_str().to_string_lossy())),
            };
            let name = self.render_segment(segment, context)?;
            if !is_valid_segment(&name) {
                return Err(invalid(relative, segment));
            }
            rendered.push(name);
        }
        Ok(rendered)
    }

    fn context(&self, config: &Config) -> BTreeMap<&str, Value> {
        BTreeMap::from([(self.binding.as_str(), Value::from_serialize(config))])
    }
}

fn is_valid_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains(std::path::MAIN_SEPARATOR)
}

fn invalid(path: &Path, segment: impl Into<String>) -> TemplateError {
    TemplateError::InvalidPathSegment {
        path: path.to_path_buf(),
        segment: segment.into(),
    }
}

fn classify(name: &str, err: minijinja::Error) -> TemplateError {
    let template = name.to_string();
    let message = err.to_string();
    match err.kind() {
        ErrorKind::UndefinedError => TemplateError::UnresolvedReference { template, message },
        ErrorKind::SyntaxError => TemplateError::Syntax { template, message },
        _ => TemplateError::Rendering { template, message },
    }
}
