//! Value kinds accepted by options.
//!
//! Caller input is untyped at the edges (options files, `Options::set`), so
//! every option declares the kinds it accepts and values are checked against
//! them before use. A value of the wrong kind is treated as absent.

use super::OptionValue;
use std::fmt;

/// The shape a value must have to be accepted by an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Any string
    String,
    /// A string with at least one character
    NonEmptyString,
    /// `true` or `false`
    Boolean,
    /// A compiled regular expression
    Regex,
    /// A filesystem path
    Path,
    /// An already-parsed manifest
    Manifest,
    /// A module loader
    Loader,
    /// An embedding host
    Host,
    /// A list whose every item has the inner kind
    List(&'static ValueKind),
    /// A string-keyed map whose every value has the inner kind
    Map(&'static ValueKind),
}

/// List of strings.
pub const STRING_LIST: ValueKind = ValueKind::List(&ValueKind::String);

/// String-to-string map.
pub const STRING_MAP: ValueKind = ValueKind::Map(&ValueKind::String);

impl ValueKind {
    /// Whether `value` has this kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use autoplug::options::OptionValue;
    /// use autoplug::options::kind::{STRING_LIST, ValueKind};
    ///
    /// let value: OptionValue<()> = OptionValue::from(vec!["t-*", "t.*"]);
    /// assert!(STRING_LIST.matches(&value));
    /// assert!(!ValueKind::String.matches(&value));
    /// ```
    pub fn matches<T>(&self, value: &OptionValue<T>) -> bool {
        match (self, value) {
            (Self::String, OptionValue::String(_)) => true,
            (Self::NonEmptyString, OptionValue::String(s)) => !s.is_empty(),
            (Self::Boolean, OptionValue::Bool(_)) => true,
            (Self::Regex, OptionValue::Regex(_)) => true,
            (Self::Path, OptionValue::Path(_)) => true,
            (Self::Manifest, OptionValue::Manifest(_)) => true,
            (Self::Loader, OptionValue::Loader(_)) => true,
            (Self::Host, OptionValue::Host(_)) => true,
            (Self::List(inner), OptionValue::List(items)) => {
                items.iter().all(|item| inner.matches(item))
            }
            (Self::Map(inner), OptionValue::Map(entries)) => {
                entries.values().all(|item| inner.matches(item))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::NonEmptyString => write!(f, "non-empty string"),
            Self::Boolean => write!(f, "boolean"),
            Self::Regex => write!(f, "regular expression"),
            Self::Path => write!(f, "path"),
            Self::Manifest => write!(f, "manifest"),
            Self::Loader => write!(f, "loader"),
            Self::Host => write!(f, "host"),
            Self::List(inner) => write!(f, "list of {inner}"),
            Self::Map(inner) => write!(f, "map of {inner}"),
        }
    }
}

/// Whether `value` has any of `kinds`.
pub fn matches_any<T>(kinds: &[ValueKind], value: &OptionValue<T>) -> bool {
    kinds.iter().any(|kind| kind.matches(value))
}

/// Human-readable alternatives, e.g. `string or list of string`.
pub fn describe(kinds: &[ValueKind]) -> String {
    kinds.iter().map(ToString::to_string).collect::<Vec<_>>().join(" or ")
}
