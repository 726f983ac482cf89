//! Property names for matched dependencies.
//!
//! A matched dependency such as `taskrunner-code-lint` is exposed in the
//! container under a short name derived in three steps:
//!
//! 1. an exact entry in the rename map wins verbatim;
//! 2. otherwise the leading prefix segment matched by the replace
//!    expression is stripped (`code-lint`);
//! 3. with camelizing enabled, dash-letter pairs collapse (`codeLint`).

use regex::Regex;
use std::collections::BTreeMap;

/// Convert dash-separated words to camelCase.
///
/// Each `-` followed by a letter is dropped and the letter upper-cased.
/// A leading dash, a dash before a non-letter, and a trailing dash are
/// left untouched, and letters that are already upper-case stay as they are.
///
/// # Examples
///
/// ```rust
/// use autoplug::naming::camelize;
///
/// assert_eq!(camelize("foo-bar"), "fooBar");
/// assert_eq!(camelize("foo-bar-baz"), "fooBarBaz");
/// assert_eq!(camelize("foo"), "foo");
/// assert_eq!(camelize("foo-2"), "foo-2");
/// ```
pub fn camelize(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    let mut at_start = true;

    while let Some(c) = chars.next() {
        if c == '-' && !at_start {
            if let Some(next) = chars.peek().copied().filter(|next| next.is_alphabetic()) {
                chars.next();
                result.extend(next.to_uppercase());
                continue;
            }
        }
        result.push(c);
        at_start = false;
    }

    result
}

/// Derives container property names from dependency names.
#[derive(Debug, Clone)]
pub struct NameTransformer {
    replace_expression: Regex,
    camelize: bool,
    rename: BTreeMap<String, String>,
}

impl NameTransformer {
    /// Build a transformer from its resolved parts.
    pub fn new(replace_expression: Regex, camelize: bool, rename: BTreeMap<String, String>) -> Self {
        Self {
            replace_expression,
            camelize,
            rename,
        }
    }

    /// The property name `dependency` is exposed under.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autoplug::naming::NameTransformer;
    /// use regex::Regex;
    /// use std::collections::BTreeMap;
    ///
    /// let rename = BTreeMap::from([("t-foo".to_string(), "alpha".to_string())]);
    /// let transformer = NameTransformer::new(Regex::new("^t([.-])").unwrap(), true, rename);
    ///
    /// assert_eq!(transformer.property_name("t-foo"), "alpha");
    /// assert_eq!(transformer.property_name("t-foo-bar"), "fooBar");
    /// assert_eq!(transformer.property_name("t.baz"), "baz");
    /// ```
    pub fn property_name(&self, dependency: &str) -> String {
        if let Some(renamed) = self.rename.get(dependency) {
            return renamed.clone();
        }

        let stripped = self.replace_expression.replacen(dependency, 1, "");
        if self.camelize {
            camelize(&stripped)
        } else {
            stripped.into_owned()
        }
    }
}
