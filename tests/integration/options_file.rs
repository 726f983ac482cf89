//! Declarative options files driving a full load.

use anyhow::Result;
use autoplug::options::{Options, OptionsFile};
use autoplug::test_utils::SpyLoader;
use autoplug::{AutoplugError, Host};

use crate::common::{ManifestBuilder, TestProject};

#[test]
fn test_toml_options_file_end_to_end() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file(
        "deps/package.json",
        &ManifestBuilder::new()
            .dep("task-code-lint")
            .dep("task-legacy")
            .dependency("peerDependencies", "task-bundle", "2.0.0")
            .build(),
    )?;
    let options_path = project.write_file(
        "autoplug.toml",
        r#"
prefix = "task"
pattern = ["task-*", "!task-legacy"]
scope = ["dependencies", "peerDependencies"]
manifest = "deps/package.json"
camelize = false
lazy = false

[rename]
"task-bundle" = "pack"
"#,
    )?;

    let spy = SpyLoader::new();
    let options: Options<String> = OptionsFile::load(&options_path)?.into_options()?;
    let plugins = autoplug::load(options.loader_arc(spy.loader()))?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["code-lint", "pack"]);
    assert_eq!(spy.loaded(), vec!["task-code-lint", "task-bundle"]);
    Ok(())
}

#[test]
fn test_json_options_file_with_camel_case_keys() -> Result<()> {
    let project = TestProject::new()?;
    project.write_file(
        "deps.json",
        &ManifestBuilder::new().dep("@acme/task-one").dep("task-two").build(),
    )?;
    let options_path = project.write_file(
        "options/autoplug.json",
        r#"{
  "pattern": "@acme/*",
  "replaceExpression": "^@acme/task-",
  "manifestFile": "deps.json"
}"#,
    )?;

    let spy = SpyLoader::new();
    let options: Options<String> = OptionsFile::load(&options_path)?.into_options()?;
    let plugins = autoplug::load(
        options.host(Host::new(project.root().join("options"))).loader_arc(spy.loader()),
    )?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["one"]);
    Ok(())
}

#[test]
fn test_malformed_options_file() -> Result<()> {
    let project = TestProject::new()?;
    let options_path = project.write_file("autoplug.yaml", "prefix: [unclosed\n")?;

    let err = OptionsFile::load(&options_path).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AutoplugError>(),
        Some(AutoplugError::ConfigError { message }) if message.contains("autoplug.yaml")
    ));
    Ok(())
}

#[test]
fn test_wrongly_typed_value_is_rejected() -> Result<()> {
    let project = TestProject::new()?;
    let options_path = project.write_file("autoplug.json", r#"{ "prefix": "t", "lazy": "yes" }"#)?;

    let err = OptionsFile::load(&options_path).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AutoplugError>(),
        Some(AutoplugError::ConfigError { .. })
    ));
    Ok(())
}
