//! File layout of one setup run.

use std::path::{Path, PathBuf};

use crate::environment::Environment;

/// Where a run reads templates from and writes results to.
///
/// Built once per run and handed to every component.
#[derive(Debug, Clone)]
pub struct SetupLayout {
    /// Directory holding the default-config templates and the project tree
    pub template_dir: PathBuf,
    /// User-editable override config
    pub override_file: PathBuf,
    /// Directory for regenerated artifacts such as the computed config
    pub state_dir: PathBuf,
    /// Package manifest used to discover the package name
    pub manifest_file: PathBuf,
    /// Root the project template tree is rendered into
    pub output_root: PathBuf,
    /// Environment used when neither the caller nor the override names one
    pub default_environment: Environment,
}

impl SetupLayout {
    pub const TEMPLATE_DIR: &'static str = "dev-setup/template";
    pub const OVERRIDE_FILE: &'static str = ".dev-setup.yml";
    pub const STATE_DIR: &'static str = ".dev-setup";
    pub const MANIFEST_FILE: &'static str = "package.xml";
    pub const PROJECT_TEMPLATE: &'static str = "project_root";
    pub const COMPUTED_TEMPLATE: &'static str = ".dev-setup.computed.yml.j2";
    pub const COMPUTED_FILE: &'static str = "computed.yml";

    /// Default layout rooted at a project directory.
    pub fn for_project(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            template_dir: root.join(Self::TEMPLATE_DIR),
            override_file: root.join(Self::OVERRIDE_FILE),
            state_dir: root.join(Self::STATE_DIR),
            manifest_file: root.join(Self::MANIFEST_FILE),
            output_root: root.to_path_buf(),
            default_environment: Environment::default(),
        }
    }

    pub fn template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    pub fn output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_root = dir.into();
        self
    }

    pub fn default_environment(mut self, env: Environment) -> Self {
        self.default_environment = env;
        self
    }

    /// Default-config template for an environment.
    pub fn base_template(&self, env: Environment) -> PathBuf {
        self.template_dir.join(format!(".dev-setup.{}.yml.j2", env))
    }

    pub fn computed_template(&self) -> PathBuf {
        self.template_dir.join(Self::COMPUTED_TEMPLATE)
    }

    /// Root of the tree mirrored into the output.
    pub fn project_template_root(&self) -> PathBuf {
        self.template_dir.join(Self::PROJECT_TEMPLATE)
    }

    pub fn computed_file(&self) -> PathBuf {
        self.state_dir.join(Self::COMPUTED_FILE)
    }
}
