//! Integration tests for config layering and tree rendering.

use std::fs;
use std::path::Path;

use devsetup_templates::{
    merge, strip_unresolved, Config, ConfigValue, TemplateError, TemplateRenderer, TreeWalker,
};
use tempfile::tempdir;

const DEFAULTS: &str = r#"
package_name: "{{ args.package_name }}"
environment: ros.humble
ros_distro: humble
devcontainer:
  image: "ros:humble-ros-base"
  feature:
    desktop_lite: false
registry: "ghcr.io/acme/{{ args.package_name }}"
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn resolved_context() -> Config {
    let defaults = Config::from_yaml_str(DEFAULTS, Path::new("defaults.yml.j2"))
        .unwrap()
        .unwrap();
    let base = strip_unresolved(&defaults);
    let user = Config::new().with("package_name", "robot_driver").with(
        "devcontainer",
        Config::new().with("feature", Config::new().with("desktop_lite", true)),
    );
    merge(&base, &user)
}

#[test]
fn test_defaults_stripped_then_overridden() {
    let context = resolved_context();

    assert_eq!(context.get("package_name").and_then(|v| v.as_str()), Some("robot_driver"));
    assert!(context.get("registry").is_none());
    assert_eq!(
        context.get_path("devcontainer.image").and_then(|v| v.as_str()),
        Some("ros:humble-ros-base")
    );
    assert_eq!(
        context.get_path("devcontainer.feature.desktop_lite"),
        Some(&ConfigValue::Bool(true))
    );
}

#[test]
fn test_full_tree_render() {
    let template = tempdir().unwrap();
    let output = tempdir().unwrap();
    let root = template.path();

    write(root, "config.yml.j2", "package: {{ args.package_name }}\ndistro: {{ args.ros_distro }}\n");
    write(root, "{{ args.package_name }}/license.txt", "MIT License\n");
    write(
        root,
        ".devcontainer/devcontainer.json.j2",
        "{\"image\": \"{{ args.devcontainer.image }}\"{% if args.devcontainer.feature.desktop_lite %}, \"lite\": true{% endif %}}\n",
    );
    write(root, ".github/workflows/ci.yml", "on: [push]\n# ${{ github.sha }}\n");
    fs::create_dir_all(root.join("empty_dir")).unwrap();

    let renderer = TemplateRenderer::new();
    let report = TreeWalker::new(&renderer)
        .render_tree(root, &resolved_context(), output.path())
        .unwrap();

    let out = output.path();
    assert_eq!(
        fs::read_to_string(out.join("config.yml")).unwrap(),
        "package: robot_driver\ndistro: humble\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("robot_driver").join("license.txt")).unwrap(),
        "MIT License\n"
    );
    assert_eq!(
        fs::read_to_string(out.join(".devcontainer").join("devcontainer.json")).unwrap(),
        "{\"image\": \"ros:humble-ros-base\", \"lite\": true}\n"
    );
    // Static content is never rendered, even when it looks like a template.
    assert_eq!(
        fs::read_to_string(out.join(".github").join("workflows").join("ci.yml")).unwrap(),
        "on: [push]\n# ${{ github.sha }}\n"
    );
    assert!(out.join("empty_dir").is_dir());
    assert_eq!(report.rendered.len(), 2);
    assert_eq!(report.copied.len(), 2);
    assert_eq!(report.file_count(), 4);
}

#[test]
fn test_stripped_field_reference_fails() {
    let template = tempdir().unwrap();
    let output = tempdir().unwrap();
    write(template.path(), "registry.txt.j2", "{{ args.registry }}");

    let renderer = TemplateRenderer::new();
    let err = TreeWalker::new(&renderer)
        .render_tree(template.path(), &resolved_context(), output.path())
        .unwrap_err();

    assert!(matches!(err, TemplateError::UnresolvedReference { .. }));
    assert!(!output.path().join("registry.txt").exists());
}

#[test]
fn test_context_not_modified_by_walk() {
    let template = tempdir().unwrap();
    let output = tempdir().unwrap();
    write(template.path(), "a.txt.j2", "{% set package_name = 'changed' %}{{ package_name }}");

    let context = resolved_context();
    let snapshot = context.clone();
    let renderer = TemplateRenderer::new();
    TreeWalker::new(&renderer)
        .render_tree(template.path(), &context, output.path())
        .unwrap();

    assert_eq!(context, snapshot);
    assert_eq!(fs::read_to_string(output.path().join("a.txt")).unwrap(), "changed");
}

#[test]
fn test_persisted_config_round_trip() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(".dev-setup.yml");
    let context = resolved_context()
        .with("build_jobs", 4i64)
        .with("opt_level", 2.5f64)
        .with("tag", "22.04")
        .with("empty", ConfigValue::Null);

    context.save(&path).unwrap();
    let reloaded = Config::load(&path).unwrap().unwrap();

    assert_eq!(reloaded, context);
}
