//! Template tree rendering.
//!
//! Walks a template root and mirrors it into an output root:
//! - directories: name rendered, created if absent
//! - `*.j2` files: name and content rendered, marker suffix dropped
//! - anything else: name rendered, bytes copied verbatim

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::atomic;
use crate::config::Config;
use crate::error::{TemplateError, TemplateResult};
use crate::renderer::TemplateRenderer;

/// File-name suffix marking a dynamic (rendered) file.
pub const DYNAMIC_SUFFIX: &str = ".j2";

/// Classification of one entry under the template root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    Dynamic,
    Static,
}

impl NodeKind {
    fn classify(path: &Path, is_dir: bool) -> Self {
        if is_dir {
            return Self::Directory;
        }
        let dynamic = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.len() > DYNAMIC_SUFFIX.len() && n.ends_with(DYNAMIC_SUFFIX));
        if dynamic {
            Self::Dynamic
        } else {
            Self::Static
        }
    }
}

/// What a tree render produced, as destination paths.
#[derive(Debug, Default, Clone)]
pub struct RenderReport {
    pub directories: Vec<PathBuf>,
    pub rendered: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
}

impl RenderReport {
    pub fn file_count(&self) -> usize {
        self.rendered.len() + self.copied.len()
    }
}

/// Renders a whole template tree into an output directory.
pub struct TreeWalker<'r> {
    renderer: &'r TemplateRenderer,
}

impl<'r> TreeWalker<'r> {
    pub fn new(renderer: &'r TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Render everything under `template_root` into `output_root`.
    ///
    /// Parents are always handled before their children. The first failing
    /// entry aborts the walk; anything already written stays on disk.
    pub fn render_tree(
        &self,
        template_root: &Path,
        context: &Config,
        output_root: &Path,
    ) -> TemplateResult<RenderReport> {
        if !template_root.is_dir() {
            return Err(TemplateError::MissingFile(template_root.to_path_buf()));
        }

        info!("Rendering template tree {:?} into {:?}", template_root, output_root);
        fs::create_dir_all(output_root).map_err(|e| TemplateError::io(output_root, e))?;

        let mut report = RenderReport::default();
        for entry in WalkDir::new(template_root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let source = entry.path();
            let Ok(relative) = source.strip_prefix(template_root) else {
                continue;
            };

            match NodeKind::classify(source, entry.file_type().is_dir()) {
                NodeKind::Directory => {
                    let dest = output_root.join(self.renderer.render_path(relative, context)?);
                    fs::create_dir_all(&dest).map_err(|e| TemplateError::io(&dest, e))?;
                    debug!("Directory: {:?}", dest);
                    report.directories.push(dest);
                }
                NodeKind::Dynamic => {
                    let dest = output_root.join(self.dynamic_destination(relative, context)?);
                    self.render_file(source, &dest, context)?;
                    debug!("Rendered: {:?} -> {:?}", relative, dest);
                    report.rendered.push(dest);
                }
                NodeKind::Static => {
                    let dest = output_root.join(self.renderer.render_path(relative, context)?);
                    atomic::copy(source, &dest)?;
                    debug!("Copied: {:?} -> {:?}", relative, dest);
                    report.copied.push(dest);
                }
            }
        }

        info!(
            "Rendered {} files and copied {} files",
            report.rendered.len(),
            report.copied.len()
        );
        Ok(report)
    }

    fn dynamic_destination(&self, relative: &Path, context: &Config) -> TemplateResult<PathBuf> {
        let name = relative
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(DYNAMIC_SUFFIX))
            .ok_or_else(|| TemplateError::InvalidPathSegment {
                path: relative.to_path_buf(),
                segment: relative.display().to_string(),
            })?;
        self.renderer.render_path(&relative.with_file_name(name), context)
    }

    fn render_file(&self, source: &Path, dest: &Path, context: &Config) -> TemplateResult<()> {
        let permissions = fs::metadata(source)
            .map_err(|e| TemplateError::io(source, e))?
            .permissions();
        // Render before touching the destination so a failure writes nothing.
        let rendered = self.renderer.render_file(source, context)?;
        atomic::write(dest, rendered.as_bytes(), Some(permissions))
    }
}

/// Render `template_root` into `output_root` with a default renderer.
pub fn render_tree(
    template_root: &Path,
    context: &Config,
    output_root: &Path,
) -> TemplateResult<RenderReport> {
    let renderer = TemplateRenderer::new();
    TreeWalker::new(&renderer).render_tree(template_root, context, output_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn context() -> Config {
        Config::new()
            .with("package_name", "robot_driver")
            .with("environment", "ros.humble")
    }

    #[test]
    fn test_classify() {
        assert_eq!(NodeKind::classify(Path::new("a/config.yml.j2"), false), NodeKind::Dynamic);
        assert_eq!(NodeKind::classify(Path::new("a/license.txt"), false), NodeKind::Static);
        assert_eq!(NodeKind::classify(Path::new("a/.j2"), false), NodeKind::Static);
        assert_eq!(NodeKind::classify(Path::new("a/dir.j2"), true), NodeKind::Directory);
    }

    #[test]
    fn test_dynamic_file_rendered_and_suffix_stripped() {
        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(template.path().join("config.yml.j2"), "name: {{ args.package_name }}\n").unwrap();

        let report = render_tree(template.path(), &context(), output.path()).unwrap();

        let dest = output.path().join("config.yml");
        assert_eq!(fs::read_to_string(&dest).unwrap(), "name: robot_driver\n");
        assert!(!output.path().join("config.yml.j2").exists());
        assert_eq!(report.rendered, vec![dest]);
    }

    #[test]
    fn test_static_file_copied_under_dynamic_directory() {
        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        let dir = template.path().join("{{ args.package_name }}");
        fs::create_dir_all(&dir).unwrap();
        let bytes = b"Licensed {{ not rendered }}\n\x00\xff";
        fs::write(dir.join("license.txt"), bytes).unwrap();

        let report = render_tree(template.path(), &context(), output.path()).unwrap();

        let dest = output.path().join("robot_driver").join("license.txt");
        assert_eq!(fs::read(&dest).unwrap(), bytes.to_vec());
        assert_eq!(report.copied, vec![dest]);
        assert_eq!(report.directories, vec![output.path().join("robot_driver")]);
    }

    #[test]
    fn test_dynamic_file_name() {
        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(template.path().join("{{ args.package_name }}.launch.j2"), "{{ args.environment }}").unwrap();

        render_tree(template.path(), &context(), output.path()).unwrap();
        assert_eq!(
            fs::read_to_string(output.path().join("robot_driver.launch")).unwrap(),
            "ros.humble"
        );
    }

    #[test]
    fn test_markup_files_not_escaped() {
        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        let context = context()
            .with("url", "https://example.org/a?b=1&c=2")
            .with("team", "R&D");
        fs::write(template.path().join("package.xml.j2"), "<url>{{ args.url }}</url>\n").unwrap();
        fs::write(template.path().join("index.html.j2"), "{{ args.team }} <tools>\n").unwrap();

        render_tree(template.path(), &context, output.path()).unwrap();

        assert_eq!(
            fs::read_to_string(output.path().join("package.xml")).unwrap(),
            "<url>https://example.org/a?b=1&c=2</url>\n"
        );
        assert_eq!(
            fs::read_to_string(output.path().join("index.html")).unwrap(),
            "R&D <tools>\n"
        );
    }

    #[test]
    fn test_markup_file_name_not_escaped() {
        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(template.path().join("{{ args.team }}.html"), "static").unwrap();

        render_tree(template.path(), &context().with("team", "R&D"), output.path()).unwrap();

        assert!(output.path().join("R&D.html").exists());
        assert!(!output.path().join("R&amp;D.html").exists());
    }

    #[test]
    fn test_undefined_reference_aborts_without_output() {
        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(template.path().join("registry.yml.j2"), "{{ args.registry }}").unwrap();

        let err = render_tree(template.path(), &context(), output.path()).unwrap_err();
        assert!(matches!(err, TemplateError::UnresolvedReference { .. }));
        assert!(!output.path().join("registry.yml").exists());
    }

    #[test]
    fn test_rerun_overwrites_and_keeps_other_files() {
        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::create_dir_all(template.path().join(".devcontainer")).unwrap();
        fs::write(
            template.path().join(".devcontainer").join("devcontainer.json.j2"),
            "{\"name\": \"{{ args.package_name }}\"}",
        )
        .unwrap();
        fs::create_dir_all(output.path().join(".devcontainer")).unwrap();
        fs::write(output.path().join(".devcontainer").join("devcontainer.json"), "stale").unwrap();
        fs::write(output.path().join("unrelated.txt"), "keep me").unwrap();

        render_tree(template.path(), &context(), output.path()).unwrap();
        render_tree(template.path(), &context(), output.path()).unwrap();

        assert_eq!(
            fs::read_to_string(output.path().join(".devcontainer").join("devcontainer.json")).unwrap(),
            "{\"name\": \"robot_driver\"}"
        );
        assert_eq!(fs::read_to_string(output.path().join("unrelated.txt")).unwrap(), "keep me");
    }

    #[test]
    fn test_missing_template_root() {
        let output = tempdir().unwrap();
        let err = render_tree(Path::new("/nonexistent/project_root"), &context(), output.path()).unwrap_err();
        assert!(matches!(err, TemplateError::MissingFile(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let template = tempdir().unwrap();
        let output = tempdir().unwrap();
        let script = template.path().join("entrypoint.sh.j2");
        fs::write(&script, "#!/bin/sh\necho {{ args.package_name }}\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        render_tree(template.path(), &context(), output.path()).unwrap();

        let mode = fs::metadata(output.path().join("entrypoint.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
