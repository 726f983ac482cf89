//! Glob filtering of dependency names.
//!
//! This module selects plugin candidates among the names collected from a
//! manifest. A pattern list mixes include and exclude rules:
//!
//! - `taskrunner-*` includes every name starting with `taskrunner-`
//! - `!taskrunner-legacy` excludes one name, whatever else matches it
//!
//! # Pattern Syntax
//!
//! Patterns use the `glob` crate's syntax:
//!
//! - `*` matches any sequence of characters within a single path segment
//!   (scoped names such as `@scope/pkg` need an explicit `@scope/*`)
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match one character from a set or range
//! - a leading `!` turns the rest of the pattern into an exclusion
//!
//! Matching is case-sensitive. A name is kept when it matches at least one
//! include and no exclusion. Output preserves input order and duplicates.
//! This crate's own package name is always excluded.

use crate::constants::SELF_NAME;
use crate::core::AutoplugError;
use anyhow::Result;
use glob::{MatchOptions, Pattern};
use tracing::{debug, trace};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A single compiled include or exclude rule.
///
/// # Examples
///
/// ```rust
/// use autoplug::pattern::NamePattern;
///
/// # fn example() -> anyhow::Result<()> {
/// let include = NamePattern::new("gulp-*")?;
/// assert!(!include.is_exclusion());
/// assert!(include.matches("gulp-concat"));
///
/// let exclude = NamePattern::new("!gulp-legacy")?;
/// assert!(exclude.is_exclusion());
/// assert!(exclude.matches("gulp-legacy"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NamePattern {
    pattern: Pattern,
    exclusion: bool,
    original_pattern: String,
}

impl NamePattern {
    /// Compile a pattern string; a leading `!` marks an exclusion.
    ///
    /// # Errors
    ///
    /// Returns [`AutoplugError::InvalidPattern`] for malformed glob syntax,
    /// such as an unclosed `[`.
    pub fn new(pattern_str: &str) -> Result<Self> {
        let (exclusion, glob) = match pattern_str.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern_str),
        };
        let pattern = Pattern::new(glob).map_err(|e| AutoplugError::InvalidPattern {
            pattern: pattern_str.to_string(),
            reason: e.msg.to_string(),
        })?;

        Ok(Self {
            pattern,
            exclusion,
            original_pattern: pattern_str.to_string(),
        })
    }

    /// Whether this rule removes names instead of adding them.
    pub fn is_exclusion(&self) -> bool {
        self.exclusion
    }

    /// Whether `name` matches the glob part of this rule.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.matches_with(name, MATCH_OPTIONS)
    }

    /// The pattern string this rule was compiled from, including any `!`.
    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }
}

/// Filters candidate names through an ordered list of glob rules.
///
/// # Examples
///
/// ```rust
/// use autoplug::pattern::NameFilter;
///
/// # fn example() -> anyhow::Result<()> {
/// let filter = NameFilter::new(&["t-*", "t.*", "!t-skip"])?;
/// let names = ["t-foo", "x-foo", "t.bar", "t-skip", "autoplug"].map(String::from);
///
/// assert_eq!(filter.filter(&names), vec!["t-foo", "t.bar"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NameFilter {
    includes: Vec<NamePattern>,
    excludes: Vec<NamePattern>,
}

impl NameFilter {
    /// Compile every pattern of the list.
    ///
    /// # Errors
    ///
    /// Fails on the first pattern that is not valid glob syntax.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut includes = Vec::new();
        let mut excludes = Vec::new();
        for pattern in patterns {
            let compiled = NamePattern::new(pattern.as_ref())?;
            if compiled.is_exclusion() {
                excludes.push(compiled);
            } else {
                includes.push(compiled);
            }
        }

        debug!(
            "Compiled name filter with {} include and {} exclude pattern(s)",
            includes.len(),
            excludes.len()
        );
        Ok(Self {
            includes,
            excludes,
        })
    }

    /// Whether a single name passes the filter.
    pub fn is_match(&self, name: &str) -> bool {
        if name == SELF_NAME {
            return false;
        }

        let included = self.includes.iter().any(|pattern| pattern.matches(name));
        if !included {
            return false;
        }

        match self.excludes.iter().find(|pattern| pattern.matches(name)) {
            Some(pattern) => {
                trace!("'{}' excluded by '{}'", name, pattern.pattern());
                false
            }
            None => true,
        }
    }

    /// Keep the names that pass the filter, in input order.
    pub fn filter<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let matched: Vec<String> = names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| {
                let keep = self.is_match(name);
                trace!("Candidate '{}': {}", name, if keep { "matched" } else { "skipped" });
                keep
            })
            .map(str::to_string)
            .collect();

        debug!("{} of {} name(s) matched", matched.len(), names.len());
        matched
    }
}
