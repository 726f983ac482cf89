//! Prefix-driven plugin loading through the public API.

use anyhow::Result;
use autoplug::options::{OptionName, Options};
use autoplug::test_utils::{SpyLoader, init_test_logging};
use autoplug::{AutoPlug, Host};
use regex::Regex;

use crate::common::{ManifestBuilder, TestProject};

fn project() -> Result<TestProject> {
    TestProject::with_manifest(
        &ManifestBuilder::new()
            .dep("t-foo")
            .dep("t-bar")
            .dep("x-foo")
            .dev_dep("t.baz")
            .dev_dep("autoplug")
            .field("scripts", serde_json::json!({ "build": "t-foo build" })),
    )
}

fn load_strings(options: Options<String>) -> Result<autoplug::Container<String>> {
    autoplug::load(options)
}

#[test]
fn test_prefix_loads_matching_dependencies() -> Result<()> {
    init_test_logging(None);
    let project = project()?;
    let spy = SpyLoader::new();

    let plugins = load_strings(
        Options::new().prefix("t").host(Host::new(project.root())).loader_arc(spy.loader()),
    )?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["foo", "bar", "baz"]);
    assert_eq!(plugins.load("foo")?, "t-foo");
    assert_eq!(plugins.load("baz")?, "t.baz");
    assert_eq!(plugins.module_name("baz"), Some("t.baz"));
    assert!(!plugins.contains_key("autoplug"));
    Ok(())
}

fn plain_project() -> Result<TestProject> {
    TestProject::with_manifest(&ManifestBuilder::new().dep("t-foo").dep("t-bar").dep("x-foo"))
}

#[test]
fn test_prefix_keys_are_exact() -> Result<()> {
    let project = plain_project()?;
    let spy = SpyLoader::new();

    let plugins = load_strings(
        Options::new().prefix("t").host(Host::new(project.root())).loader_arc(spy.loader()),
    )?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["foo", "bar"]);
    assert_eq!(plugins.load("bar")?, "t-bar");
    Ok(())
}

#[test]
fn test_rename_replaces_derived_key() -> Result<()> {
    let project = plain_project()?;
    let spy = SpyLoader::new();

    let plugins = load_strings(
        Options::new()
            .prefix("t")
            .rename([("t-foo", "alpha")])
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["alpha", "bar"]);
    assert_eq!(plugins.load("alpha")?, "t-foo");
    assert!(!plugins.contains_key("foo"));
    Ok(())
}

#[test]
fn test_rename_camelize_and_collisions() -> Result<()> {
    let project = TestProject::with_manifest(
        &ManifestBuilder::new().dep("t-foo-bar").dep("t-code-lint").dev_dep("t.foo-bar"),
    )?;
    let spy = SpyLoader::new();

    let plugins = load_strings(
        Options::new()
            .prefix("t")
            .rename([("t-code-lint", "lint")])
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["fooBar", "lint"]);
    assert_eq!(plugins.load("lint")?, "t-code-lint");
    assert_eq!(plugins.load("fooBar")?, "t.foo-bar");
    assert_eq!(plugins.module_name("fooBar"), Some("t.foo-bar"));
    Ok(())
}

#[test]
fn test_camelize_disabled_keeps_dashes() -> Result<()> {
    let project = TestProject::with_manifest(&ManifestBuilder::new().dep("t-foo-bar"))?;
    let spy = SpyLoader::new();

    let plugins = load_strings(
        Options::new()
            .prefix("t")
            .camelize(false)
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["foo-bar"]);
    Ok(())
}

#[test]
fn test_custom_pattern_and_expression_without_prefix() -> Result<()> {
    let project = TestProject::with_manifest(
        &ManifestBuilder::new().dep("@tools/t-alpha").dep("t-beta").dep("@other/t-gamma"),
    )?;
    let spy = SpyLoader::new();

    let plugins = load_strings(
        Options::new()
            .patterns(["@tools/*"])
            .replace_expression(Regex::new(r"^@tools/t-")?)
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["alpha"]);
    assert_eq!(plugins.load("alpha")?, "@tools/t-alpha");
    Ok(())
}

#[test]
fn test_exclusion_patterns() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();

    let plug = AutoPlug::new(
        Options::new()
            .prefix("t")
            .patterns(["t-*", "t.*", "!t-bar"])
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;

    assert_eq!(plug.matched_names(), vec!["t-foo", "t.baz"]);
    Ok(())
}

#[test]
fn test_scope_limits_sections() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();

    let plugins = load_strings(
        Options::new()
            .prefix("t")
            .set(OptionName::Scope, "devDependencies")
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["baz"]);
    Ok(())
}

#[test]
fn test_registry_modules_through_default_loader() -> Result<()> {
    let project = project()?;
    let host: Host<String> = Host::new(project.root());
    host.registry().register("t-foo", || Ok("foo module".to_string()));
    host.registry().register("t-bar", || Ok("bar module".to_string()));
    host.registry().register("t.baz", || Ok("baz module".to_string()));

    let plugins = autoplug::load(Options::new().prefix("t").lazy(false).host(host.clone()))?;

    assert_eq!(plugins.load("bar")?, "bar module");
    assert!(host.registry().is_cached("t-foo"));
    assert!(host.registry().is_cached("t.baz"));
    Ok(())
}

#[test]
fn test_empty_match_yields_empty_container() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();

    let plugins = load_strings(
        Options::new().prefix("zz").host(Host::new(project.root())).loader_arc(spy.loader()),
    )?;

    assert!(plugins.is_empty());
    assert_eq!(plugins.len(), 0);
    Ok(())
}
