//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use devsetup_core::{Environment, SetupRequest, DEFAULT_PACKAGE_NAME};

/// dev-setup - render development-environment scaffolding for a project
#[derive(Parser, Debug)]
#[command(name = "dev-setup")]
#[command(version, about = "Render devcontainer, CI and container scaffolding for a project")]
#[command(long_about = r#"
dev-setup resolves the project's configuration from three layers and renders
the template tree under dev-setup/template/project_root into the project.

LAYERS:
  base      → dev-setup/template/.dev-setup.<environment>.yml.j2
  override  → .dev-setup.yml (created on first run, yours to edit)
  computed  → dev-setup/template/.dev-setup.computed.yml.j2

The override always wins over the computed layer.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Missing required file
  4 - Template error
  5 - Manifest error
  6 - Config error
"#)]
pub struct Cli {
    /// The name of the package
    #[arg(long, alias = "package_name", default_value = DEFAULT_PACKAGE_NAME)]
    pub package_name: String,

    /// The environment for the package (inferred when omitted)
    #[arg(short, long, value_enum)]
    pub environment: Option<EnvironmentArg>,

    /// Enable desktop_lite for the devcontainer
    #[arg(long, alias = "desktop_lite")]
    pub desktop_lite: bool,

    /// Automatically answer 'yes' to all prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Template directory (defaults to <project-root>/dev-setup/template)
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Directory to render the project tree into (defaults to the project root)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the final merged config as YAML
    #[arg(long)]
    pub show_config: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn request(&self) -> SetupRequest {
        SetupRequest {
            package_name: self.package_name.clone(),
            environment: self.environment.map(Environment::from),
            desktop_lite: self.desktop_lite,
        }
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "devsetup_core=debug,devsetup_templates=debug,dev_setup=debug,warn"
        } else if self.quiet {
            "warn"
        } else {
            "devsetup_core=info,devsetup_templates=info,dev_setup=info,warn"
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EnvironmentArg {
    #[value(name = "ros.noetic")]
    RosNoetic,
    #[value(name = "ros.humble")]
    RosHumble,
    #[value(name = "debian")]
    Debian,
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::RosNoetic => Environment::RosNoetic,
            EnvironmentArg::RosHumble => Environment::RosHumble,
            EnvironmentArg::Debian => Environment::Debian,
        }
    }
}
