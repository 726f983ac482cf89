//! Amending options on a staged pipeline.

use anyhow::Result;
use autoplug::options::{OptionName, Options};
use autoplug::test_utils::SpyLoader;
use autoplug::{AutoPlug, AutoplugError, Host};
use regex::Regex;

use crate::common::{ManifestBuilder, TestProject};

fn project() -> Result<TestProject> {
    TestProject::with_manifest(
        &ManifestBuilder::new().dep("gulp-concat").dep("gulp-uglify").dep("jack-serve"),
    )
}

#[test]
fn test_new_prefix_resets_derived_options() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();
    let mut plug = AutoPlug::new(
        Options::new()
            .prefix("gulp")
            .patterns(["gulp-concat"])
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;
    assert_eq!(plug.matched_names(), vec!["gulp-concat"]);

    plug.set_options("jack")?;

    assert_eq!(plug.config().pattern(), ["jack-*", "jack.*", "!autoplug"]);
    assert_eq!(plug.config().replace_expression().as_str(), "^jack([.-])");
    assert_eq!(plug.plug()?.keys().collect::<Vec<_>>(), vec!["serve"]);
    Ok(())
}

#[test]
fn test_new_prefix_with_explicit_pattern_keeps_it() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();
    let mut plug = AutoPlug::new(
        Options::new().prefix("gulp").host(Host::new(project.root())).loader_arc(spy.loader()),
    )?;

    plug.set_options(
        Options::new()
            .prefix("jack")
            .patterns(["gulp-uglify"])
            .replace_expression(Regex::new("^gulp-")?),
    )?;

    assert_eq!(plug.plug()?.keys().collect::<Vec<_>>(), vec!["uglify"]);
    Ok(())
}

#[test]
fn test_unrelated_options_keep_derived_values() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();
    let mut plug = AutoPlug::new(
        Options::new()
            .prefix("gulp")
            .patterns(["gulp-uglify"])
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;

    plug.set_options(Options::new().lazy(false))?;

    assert!(!plug.config().lazy());
    assert_eq!(plug.config().pattern(), ["gulp-uglify", "!autoplug"]);
    assert_eq!(spy.calls(), 0);
    plug.plug()?;
    assert_eq!(spy.loaded(), vec!["gulp-uglify"]);
    Ok(())
}

#[test]
fn test_new_host_resets_manifest_and_loader() -> Result<()> {
    let first = project()?;
    let second = TestProject::with_manifest(&ManifestBuilder::new().dep("gulp-sass"))?;
    let spy = SpyLoader::new();
    let mut plug = AutoPlug::new(
        Options::new().prefix("gulp").host(Host::new(first.root())).loader_arc(spy.loader()),
    )?;

    let host: Host<String> = Host::new(second.root());
    host.registry().register_value("gulp-sass", "sass module".to_string());
    plug.set_options(Options::new().host(host))?;

    let plugins = plug.plug()?;
    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["sass"]);
    assert_eq!(plugins.load("sass")?, "sass module");
    assert_eq!(spy.calls(), 0);
    Ok(())
}

#[test]
fn test_invalid_prefix_in_update_changes_nothing_derived() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();
    let mut plug = AutoPlug::new(
        Options::new().prefix("gulp").host(Host::new(project.root())).loader_arc(spy.loader()),
    )?;

    let err = plug
        .set_options(Options::new().set(OptionName::Prefix, ""))
        .err()
        .expect("an empty prefix is not valid");

    assert!(matches!(
        err.downcast_ref::<AutoplugError>(),
        Some(AutoplugError::InvalidOptions { .. })
    ));
    assert_eq!(plug.config().prefix(), Some("gulp"));
    Ok(())
}
