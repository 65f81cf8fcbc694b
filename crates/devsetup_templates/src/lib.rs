//! # devsetup_templates
//!
//! Config layering and template-tree rendering for dev-setup.
//!
//! This crate holds the pieces that do not know about environments or
//! persisted state:
//!
//! - The [`Config`] data model and its YAML persistence
//! - Deep merging of configs ([`merge`])
//! - Removal of unresolved placeholders ([`strip_unresolved`])
//! - Rendering of template text and path names ([`TemplateRenderer`])
//! - Mirroring a template tree into an output tree ([`TreeWalker`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use devsetup_templates::{merge, strip_unresolved, Config, TemplateRenderer, TreeWalker};
//! use std::path::Path;
//!
//! let defaults = Config::load(Path::new("defaults.yml.j2")).unwrap().unwrap_or_default();
//! let user = Config::new().with("package_name", "robot_driver");
//! let context = merge(&strip_unresolved(&defaults), &user);
//!
//! let renderer = TemplateRenderer::new();
//! TreeWalker::new(&renderer)
//!     .render_tree(Path::new("template/project_root"), &context, Path::new("."))
//!     .unwrap();
//! ```

mod atomic;
pub mod config;
pub mod error;
pub mod merge;
pub mod placeholder;
pub mod renderer;
pub mod walker;

pub use config::{Config, ConfigValue};
pub use error::{TemplateError, TemplateResult};
pub use merge::{merge, merge_layers};
pub use placeholder::{is_unresolved, strip_unresolved, unresolved_paths};
pub use renderer::{TemplateRenderer, DEFAULT_BINDING};
pub use walker::{render_tree, NodeKind, RenderReport, TreeWalker, DYNAMIC_SUFFIX};
