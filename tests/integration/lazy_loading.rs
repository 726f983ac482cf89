//! Lazy and eager binding behavior.

use anyhow::{Result, bail};
use autoplug::options::Options;
use autoplug::test_utils::SpyLoader;
use autoplug::{AutoplugError, Host, ModuleRegistry};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::common::{ManifestBuilder, TestProject};

fn project() -> Result<TestProject> {
    TestProject::with_manifest(&ManifestBuilder::new().dep("t-foo").dep("t-bar").dev_dep("t-baz"))
}

#[test]
fn test_lazy_loads_once_per_access() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();

    let plugins: autoplug::Container<String> = autoplug::load(
        Options::new().prefix("t").host(Host::new(project.root())).loader_arc(spy.loader()),
    )?;
    assert_eq!(spy.calls(), 0);
    assert!(plugins.iter().all(|(_, binding)| binding.is_lazy()));

    plugins.load("bar")?;
    plugins.load("bar")?;
    assert_eq!(spy.calls_for("t-bar"), 2);
    assert_eq!(spy.calls(), 2);
    Ok(())
}

#[test]
fn test_eager_loads_in_scan_order() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();

    let plugins: autoplug::Container<String> = autoplug::load(
        Options::new()
            .prefix("t")
            .lazy(false)
            .host(Host::new(project.root()))
            .loader_arc(spy.loader()),
    )?;

    assert_eq!(spy.loaded(), vec!["t-foo", "t-bar", "t-baz"]);
    assert!(plugins.iter().all(|(_, binding)| !binding.is_lazy()));
    plugins.load("baz")?;
    assert_eq!(spy.calls(), 3);
    Ok(())
}

#[test]
fn test_eager_error_stops_construction() -> Result<()> {
    let project = project()?;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let result = autoplug::load(
        Options::new()
            .prefix("t")
            .lazy(false)
            .host(Host::new(project.root()))
            .loader(move |name: &str| -> Result<u32> {
                counter.fetch_add(1, Ordering::SeqCst);
                if name == "t-bar" {
                    bail!("cannot load {name}");
                }
                Ok(1)
            }),
    );

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "cannot load t-bar");
    assert!(err.downcast_ref::<AutoplugError>().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_lazy_access_through_shared_registry_is_cached() -> Result<()> {
    let project = project()?;
    let builds = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(ModuleRegistry::new());
    for name in ["t-foo", "t-bar", "t-baz"] {
        let builds = Arc::clone(&builds);
        registry.register(name, move || {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(name.len())
        });
    }

    let plugins = autoplug::load(
        Options::new()
            .prefix("t")
            .host(Host::new(project.root()).with_registry(Arc::clone(&registry))),
    )?;

    assert_eq!(builds.load(Ordering::SeqCst), 0);
    assert_eq!(plugins.load("foo")?, 5);
    assert_eq!(plugins.load("foo")?, 5);
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_container_shared_across_threads() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();
    let plugins: Arc<autoplug::Container<String>> = Arc::new(autoplug::load(
        Options::new().prefix("t").host(Host::new(project.root())).loader_arc(spy.loader()),
    )?);

    let handles: Vec<_> = ["foo", "bar", "baz"]
        .into_iter()
        .map(|key| {
            let plugins = Arc::clone(&plugins);
            std::thread::spawn(move || plugins.load(key).map(|module| module.len()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("loader thread panicked")?, 5);
    }
    assert_eq!(spy.calls(), 3);
    Ok(())
}

#[test]
fn test_missing_key() -> Result<()> {
    let project = project()?;
    let spy = SpyLoader::new();
    let plugins: autoplug::Container<String> = autoplug::load(
        Options::new().prefix("t").host(Host::new(project.root())).loader_arc(spy.loader()),
    )?;

    let err = plugins.load("qux").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AutoplugError>(),
        Some(AutoplugError::PluginNotFound { name }) if name == "qux"
    ));
    assert!(plugins.get("qux").is_none());
    Ok(())
}
