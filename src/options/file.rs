//! Declarative options files.
//!
//! Tools embedding autoplug can let users keep their plugin settings in a
//! file next to the project instead of in code. Any of the structured
//! formats accepted for manifests works; the extension picks the parser.
//!
//! ```toml
//! prefix = "taskrunner"
//! pattern = ["taskrunner-*", "!taskrunner-legacy"]
//! scope = "dependencies"
//! manifest = "config/deps.json"
//! lazy = false
//!
//! [rename]
//! "taskrunner-code-lint" = "lint"
//! ```
//!
//! Keys may also be written in camelCase (`replaceExpression`,
//! `manifestFile`). Unknown keys are rejected.

use super::{OptionName, OptionValue, Options};
use crate::core::AutoplugError;
use crate::core::file_error::read_to_string_with_context;
use crate::manifest::manifest_io::DocumentFormat;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single entry
    One(String),
    /// Several entries, in order
    Many(Vec<String>),
}

impl OneOrMany {
    /// The entries as a list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(single) => vec![single],
            Self::Many(list) => list,
        }
    }
}

/// Options as written in an options file.
///
/// Every key is optional; absent keys resolve to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsFile {
    /// Plugin naming convention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Include/exclude glob patterns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<OneOrMany>,

    /// Regular expression source, compiled on conversion
    #[serde(default, alias = "replaceExpression", skip_serializing_if = "Option::is_none")]
    pub replace_expression: Option<String>,

    /// Manifest sections to scan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<OneOrMany>,

    /// Manifest path; relative paths are taken from the options file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,

    /// Manifest filename used for discovery
    #[serde(default, alias = "manifestFile", skip_serializing_if = "Option::is_none")]
    pub manifest_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camelize: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,

    /// Dependency name → property name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rename: BTreeMap<String, String>,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl OptionsFile {
    /// Read an options file; the extension selects JSON, TOML or YAML.
    ///
    /// # Errors
    ///
    /// The file cannot be read, or its content is not a valid options
    /// document ([`AutoplugError::ConfigError`]).
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_to_string_with_context(path, "loading autoplug options")?;
        let format = DocumentFormat::from_path(path);
        debug!("Loading {:?} options file {}", format, path.display());

        let document = format.parse(&content).map_err(|e| config_error(path, &e.to_string()))?;
        let mut file: Self =
            serde_json::from_value(document).map_err(|e| config_error(path, &e.to_string()))?;
        file.base_dir = path.parent().map(Path::to_path_buf);
        Ok(file)
    }

    /// Parse TOML options; relative manifest paths stay relative.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AutoplugError::ConfigError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Directory relative manifest paths are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Convert into [`Options`] for resolution.
    ///
    /// # Errors
    ///
    /// [`AutoplugError::ConfigError`] when `replace_expression` is not a
    /// valid regular expression.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autoplug::options::{OptionName, Options, OptionsFile};
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let file = OptionsFile::from_toml_str(r#"
    /// prefix = "t"
    /// pattern = "t-*"
    /// lazy = false
    /// "#)?;
    /// let options: Options<()> = file.into_options()?;
    ///
    /// assert!(options.is_valid(OptionName::Prefix));
    /// assert!(options.contains(OptionName::Lazy));
    /// assert!(!options.contains(OptionName::Scope));
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_options<T>(self) -> Result<Options<T>> {
        let mut options = Options::new();

        if let Some(prefix) = self.prefix {
            options = options.prefix(prefix);
        }
        if let Some(pattern) = self.pattern {
            options = options.patterns(pattern.into_vec());
        }
        if let Some(source) = self.replace_expression {
            let expression = Regex::new(&source).map_err(|e| AutoplugError::ConfigError {
                message: format!("invalid replace_expression '{source}': {e}"),
            })?;
            options = options.replace_expression(expression);
        }
        if let Some(scope) = self.scope {
            options = options.scope(scope.into_vec());
        }
        if let Some(manifest) = self.manifest {
            let manifest = match &self.base_dir {
                Some(dir) if manifest.is_relative() => dir.join(manifest),
                _ => manifest,
            };
            options = options.manifest_path(manifest);
        }
        if let Some(file_name) = self.manifest_file {
            options = options.manifest_file(file_name);
        }
        if let Some(camelize) = self.camelize {
            options = options.camelize(camelize);
        }
        if let Some(lazy) = self.lazy {
            options = options.lazy(lazy);
        }
        if !self.rename.is_empty() {
            let entries =
                self.rename.into_iter().map(|(from, to)| (from, OptionValue::String(to))).collect();
            options = options.set(OptionName::Rename, OptionValue::Map(entries));
        }

        Ok(options)
    }
}

fn config_error(path: &Path, reason: &str) -> AutoplugError {
    AutoplugError::ConfigError {
        message: format!("invalid options file '{}': {reason}", path.display()),
    }
}
