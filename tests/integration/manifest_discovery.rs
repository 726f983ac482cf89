//! Locating and reading dependency manifests.

use anyhow::Result;
use autoplug::options::Options;
use autoplug::test_utils::SpyLoader;
use autoplug::{AutoPlug, AutoplugError, Host};
use serial_test::serial;

use crate::common::{ManifestBuilder, TestProject};

fn spy_options(spy: &SpyLoader) -> Options<String> {
    Options::new().prefix("t").loader_arc(spy.loader())
}

fn error_of(err: &anyhow::Error) -> Option<&AutoplugError> {
    err.downcast_ref::<AutoplugError>()
}

#[test]
fn test_discovers_manifest_from_nested_host_directory() -> Result<()> {
    let project = TestProject::with_manifest(&ManifestBuilder::new().dep("t-foo"))?;
    let nested = project.create_dir("src/tasks/deep")?;
    let spy = SpyLoader::new();

    let plug = AutoPlug::new(spy_options(&spy).host(Host::new(nested)))?;

    assert_eq!(plug.matched_names(), vec!["t-foo"]);
    Ok(())
}

#[test]
fn test_nearest_manifest_wins() -> Result<()> {
    let project = TestProject::with_manifest(&ManifestBuilder::new().dep("t-outer"))?;
    project.write_file("packages/inner/package.json", &ManifestBuilder::new().dep("t-inner").build())?;
    let spy = SpyLoader::new();

    let plug = AutoPlug::new(
        spy_options(&spy).host(Host::new(project.root().join("packages/inner"))),
    )?;

    assert_eq!(plug.matched_names(), vec!["t-inner"]);
    Ok(())
}

#[test]
fn test_cargo_toml_manifest() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file(
        "Cargo.toml",
        r#"
[package]
name = "host-tool"
version = "0.1.0"

[dependencies]
t-lint = "1.2"
t-code-format = { version = "0.4", features = ["strict"] }
serde = "1.0"

[dev-dependencies]
t-test = { path = "../t-test" }
"#,
    )?;
    let spy = SpyLoader::new();

    let plug = AutoPlug::new(
        spy_options(&spy)
            .manifest_file("Cargo.toml")
            .scope(["dependencies", "dev-dependencies"])
            .host(Host::new(project.root())),
    )?;

    let section = plug.config().manifest().section("dependencies").expect("dependencies section");
    assert_eq!(section.version("t-code-format"), Some("0.4"));
    let dev = plug.config().manifest().section("dev-dependencies").expect("dev section");
    assert_eq!(dev.version("t-test"), Some("*"));

    let plugins = plug.into_container()?;
    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["lint", "codeFormat", "test"]);
    Ok(())
}

#[test]
fn test_yaml_manifest_path() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_file(
        "config/deps.yaml",
        "dependencies:\n  t-foo: \"1.0.0\"\n  x-bar: \"1.0.0\"\ndevDependencies:\n  t-baz: \"*\"\n",
    )?;
    let spy = SpyLoader::new();

    let plug = AutoPlug::new(spy_options(&spy).manifest_path(path))?;

    assert_eq!(plug.matched_names(), vec!["t-foo", "t-baz"]);
    Ok(())
}

#[test]
fn test_missing_manifest_fails_before_loading() -> Result<()> {
    let project = TestProject::new()?;
    let spy = SpyLoader::new();

    let err = AutoPlug::new(
        spy_options(&spy).manifest_file("autoplug-missing.json").host(Host::new(project.root())),
    )
    .err()
    .expect("resolution should fail");

    assert!(matches!(
        error_of(&err),
        Some(AutoplugError::ManifestNotFound { file }) if file == "autoplug-missing.json"
    ));
    assert_eq!(
        err.to_string(),
        "Could not find dependencies. Do you have a autoplug-missing.json file in your project?"
    );
    assert_eq!(spy.calls(), 0);
    Ok(())
}

#[test]
fn test_non_mapping_document_counts_as_missing() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_file("package.json", "[\"t-foo\"]")?;
    let spy = SpyLoader::new();

    let err = AutoPlug::new(spy_options(&spy).manifest_path(path)).err().expect("should fail");

    assert!(matches!(error_of(&err), Some(AutoplugError::ManifestNotFound { .. })));
    Ok(())
}

#[test]
fn test_malformed_manifest_reports_path() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_file("package.json", "{ \"dependencies\": ")?;
    let spy = SpyLoader::new();

    let err = AutoPlug::new(spy_options(&spy).manifest_path(&path)).err().expect("should fail");

    match error_of(&err) {
        Some(AutoplugError::ManifestLoadError {
            path: reported,
            ..
        }) => assert_eq!(reported, &path.display().to_string()),
        other => panic!("expected ManifestLoadError, got {other:?}"),
    }
    Ok(())
}

#[test]
#[serial]
fn test_default_host_uses_working_directory() -> Result<()> {
    let project = TestProject::with_manifest(&ManifestBuilder::new().dep("t-cwd"))?;
    let nested = project.create_dir("lib")?;
    let original = std::env::current_dir()?;
    std::env::set_current_dir(&nested)?;

    let spy = SpyLoader::new();
    let result = AutoPlug::new(spy_options(&spy)).map(|plug| plug.matched_names());

    std::env::set_current_dir(original)?;
    assert_eq!(result?, vec!["t-cwd"]);
    Ok(())
}

#[test]
#[serial]
fn test_relative_host_directory_walks_real_ancestors() -> Result<()> {
    let project = TestProject::with_manifest(&ManifestBuilder::new().dep("t-rel"))?;
    let nested = project.create_dir("tools/build")?;
    let original = std::env::current_dir()?;
    std::env::set_current_dir(&nested)?;

    let spy = SpyLoader::new();
    let from_dot = AutoPlug::new(spy_options(&spy).host(Host::new("."))).map(|plug| plug.matched_names());
    let from_child = std::fs::create_dir_all("scripts")
        .map_err(anyhow::Error::from)
        .and_then(|()| AutoPlug::new(spy_options(&spy).host(Host::new("scripts"))))
        .map(|plug| plug.matched_names());

    std::env::set_current_dir(original)?;
    assert_eq!(from_dot?, vec!["t-rel"]);
    assert_eq!(from_child?, vec!["t-rel"]);
    Ok(())
}
