//! Config resolution for a setup run.
//!
//! A run goes through these steps:
//! 1. Pick the environment (caller, then override file, then default)
//! 2. Load the environment's default config and strip placeholders
//! 3. Load the override file, or synthesize one from the caller's values
//! 4. Reconcile fields where the override and the caller disagree
//! 5. Persist the override if it is new or changed
//! 6. Render the computed-config template against the override
//! 7. Merge the override over the computed config
//! 8. Render the project template tree with the merged config

use devsetup_templates::{
    merge, strip_unresolved, unresolved_paths, Config, ConfigValue, RenderReport, TemplateError,
    TemplateRenderer, TreeWalker,
};
use tracing::{debug, info, warn};

use crate::decision::ConflictResolver;
use crate::environment::Environment;
use crate::error::{CoreError, CoreResult};
use crate::layout::SetupLayout;
use crate::manifest;
use crate::request::SetupRequest;

pub const PACKAGE_NAME_FIELD: &str = "package_name";
pub const ENVIRONMENT_FIELD: &str = "environment";
pub const DESKTOP_LITE_FIELD: &str = "devcontainer.feature.desktop_lite";

/// The config layers produced by one resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub environment: Environment,
    /// Environment defaults with the override applied
    pub user: Config,
    /// Values derived from the user config
    pub computed: Config,
    /// Final render context: `user` merged over `computed`
    pub context: Config,
    /// Whether the override file was (re)written
    pub override_written: bool,
}

/// Result of a complete setup run.
#[derive(Debug)]
pub struct SetupOutcome {
    pub resolution: Resolution,
    pub report: RenderReport,
}

/// Resolves the layered config for a project layout.
pub struct ConfigResolver<'a> {
    layout: &'a SetupLayout,
    renderer: TemplateRenderer,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(layout: &'a SetupLayout) -> Self {
        Self {
            layout,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Resolve the final render context.
    pub fn resolve(
        &self,
        request: &SetupRequest,
        decide: &mut dyn ConflictResolver,
    ) -> CoreResult<Resolution> {
        let persisted = self.load_override()?;
        let environment = self.determine_environment(request, persisted.as_ref())?;
        info!("Using environment {}", environment);

        let base = self.load_base(environment)?;

        let (user, override_written) = match persisted {
            Some(persisted) => {
                info!("Override config found at {:?}", self.layout.override_file);
                let mut user = merge(&base, &persisted);
                let changed = self.reconcile(&mut user, request, decide)?;
                (user, changed)
            }
            None => {
                info!(
                    "No override config at {:?}, creating one",
                    self.layout.override_file
                );
                (self.synthesize_override(&base, environment, request)?, true)
            }
        };

        if override_written {
            user.save(&self.layout.override_file)?;
            info!("Wrote override config {:?}", self.layout.override_file);
        }

        let environment = match user.get(ENVIRONMENT_FIELD).and_then(|v| v.as_str()) {
            Some(value) => value.parse()?,
            None => environment,
        };

        let computed = self.render_computed(&user)?;
        let context = merge(&computed, &user);
        debug!("Resolved context: {:?}", context);

        Ok(Resolution {
            environment,
            user,
            computed,
            context,
            override_written,
        })
    }

    /// Render the project template tree with a resolved context.
    pub fn render_project(&self, context: &Config) -> CoreResult<RenderReport> {
        let report = TreeWalker::new(&self.renderer).render_tree(
            &self.layout.project_template_root(),
            context,
            &self.layout.output_root,
        )?;
        Ok(report)
    }

    /// Caller first, then the override file, then the layout default.
    pub fn determine_environment(
        &self,
        request: &SetupRequest,
        persisted: Option<&Config>,
    ) -> CoreResult<Environment> {
        if let Some(env) = request.environment {
            debug!("Environment from request: {}", env);
            return Ok(env);
        }

        match persisted.and_then(|config| config.get(ENVIRONMENT_FIELD)) {
            Some(ConfigValue::String(value)) => {
                debug!("Environment from override config: {}", value);
                value.parse()
            }
            Some(other) => Err(CoreError::schema(
                ENVIRONMENT_FIELD,
                format!("expected a string, found {}", other),
            )),
            None => {
                debug!(
                    "No environment configured, using default {}",
                    self.layout.default_environment
                );
                Ok(self.layout.default_environment)
            }
        }
    }

    /// Load an environment's default config with placeholders removed.
    pub fn load_base(&self, environment: Environment) -> CoreResult<Config> {
        let path = self.layout.base_template(environment);
        let defaults = Config::load(&path)?.ok_or_else(|| TemplateError::Malformed {
            path: path.clone(),
            message: "default config is empty".to_string(),
        })?;
        Ok(strip_unresolved(&defaults))
    }

    /// Load the override file. An absent or empty file yields `None`.
    ///
    /// Values still holding template expressions are dropped with a warning.
    pub fn load_override(&self) -> CoreResult<Option<Config>> {
        let path = &self.layout.override_file;
        if !path.exists() {
            return Ok(None);
        }
        let Some(loaded) = Config::load(path)? else {
            warn!("Override config {:?} is empty, recreating it", path);
            return Ok(None);
        };
        for field in unresolved_paths(&loaded) {
            warn!(
                "Ignoring '{}' in {:?}: the override config cannot hold template expressions",
                field, path
            );
        }
        Ok(Some(strip_unresolved(&loaded)))
    }

    /// Build a fresh override from the caller's values over the defaults.
    pub fn synthesize_override(
        &self,
        base: &Config,
        environment: Environment,
        request: &SetupRequest,
    ) -> CoreResult<Config> {
        let package_name = self.package_name_for(request)?;
        let mut overlay = Config::new()
            .with(ENVIRONMENT_FIELD, environment.as_str())
            .with(PACKAGE_NAME_FIELD, package_name);
        overlay.set_path(DESKTOP_LITE_FIELD, request.desktop_lite);

        Ok(merge(base, &overlay))
    }

    /// Apply the caller's values to a loaded override, asking `decide` on conflicts.
    ///
    /// Returns whether anything changed.
    pub fn reconcile(
        &self,
        user: &mut Config,
        request: &SetupRequest,
        decide: &mut dyn ConflictResolver,
    ) -> CoreResult<bool> {
        let mut changed = false;
        if let Some(name) = request.explicit_package_name() {
            changed |= reconcile_field(user, PACKAGE_NAME_FIELD, name.into(), decide)?;
        }
        if let Some(env) = request.environment {
            changed |= reconcile_field(user, ENVIRONMENT_FIELD, env.as_str().into(), decide)?;
        }
        changed |= reconcile_field(user, DESKTOP_LITE_FIELD, request.desktop_lite.into(), decide)?;
        Ok(changed)
    }

    /// Render the computed-config template and keep a copy in the state dir.
    pub fn render_computed(&self, user: &Config) -> CoreResult<Config> {
        let path = self.layout.computed_template();
        let rendered = self.renderer.render_file(&path, user)?;
        let computed = Config::from_yaml_str(&rendered, &path)?.ok_or_else(|| {
            TemplateError::Malformed {
                path: path.clone(),
                message: "computed config rendered empty".to_string(),
            }
        })?;
        let computed = strip_unresolved(&computed);

        computed.save(&self.layout.computed_file())?;
        debug!("Wrote computed config {:?}", self.layout.computed_file());
        Ok(computed)
    }

    fn package_name_for(&self, request: &SetupRequest) -> CoreResult<String> {
        if let Some(name) = request.explicit_package_name() {
            return Ok(name.to_string());
        }
        if self.layout.manifest_file.exists() {
            let name = manifest::read_package_name(&self.layout.manifest_file)?;
            info!("Package name from manifest: {}", name);
            return Ok(name);
        }
        warn!(
            "No manifest found at {:?}. Using '{}' as the package name.",
            self.layout.manifest_file, request.package_name
        );
        Ok(request.package_name.clone())
    }
}

fn reconcile_field(
    user: &mut Config,
    field: &str,
    proposed: ConfigValue,
    decide: &mut dyn ConflictResolver,
) -> CoreResult<bool> {
    let current = user
        .get_path(field)
        .cloned()
        .ok_or_else(|| CoreError::schema(field, "missing from the override config"))?;
    if current == proposed {
        return Ok(false);
    }

    warn!(
        "'{}' in the override config differs from the requested value: {} -> {}",
        field, current, proposed
    );
    let chosen = decide.resolve(field, &current, &proposed)?;
    if chosen == current {
        return Ok(false);
    }
    user.set_path(field, chosen);
    Ok(true)
}

/// Resolve the config and render the project tree.
pub fn run_setup(
    layout: &SetupLayout,
    request: &SetupRequest,
    decide: &mut dyn ConflictResolver,
) -> CoreResult<SetupOutcome> {
    let resolver = ConfigResolver::new(layout);
    let resolution = resolver.resolve(request, decide)?;
    let report = resolver.render_project(&resolution.context)?;
    info!(
        "Setup complete: {} files written to {:?}",
        report.file_count(),
        layout.output_root
    );
    Ok(SetupOutcome { resolution, report })
}
