//! A loader that records what it loads.

use crate::loader::Loader;
use anyhow::Result;
use std::sync::{Arc, Mutex};

/// Loads every module as its own name and records each call.
///
/// Clones share the same record.
#[derive(Clone, Default)]
pub struct SpyLoader {
    loaded: Arc<Mutex<Vec<String>>>,
}

impl SpyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// This spy as a shareable loader.
    pub fn loader(&self) -> Arc<dyn Loader<String>> {
        Arc::new(self.clone())
    }

    /// Total number of loads.
    pub fn calls(&self) -> usize {
        self.record().len()
    }

    /// Number of loads of `name`.
    pub fn calls_for(&self, name: &str) -> usize {
        self.record().iter().filter(|loaded| *loaded == name).count()
    }

    /// Loaded names in call order.
    pub fn loaded(&self) -> Vec<String> {
        self.record().clone()
    }

    fn record(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.loaded.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Loader<String> for SpyLoader {
    fn load(&self, name: &str) -> Result<String> {
        self.record().push(name.to_string());
        Ok(name.to_string())
    }
}
