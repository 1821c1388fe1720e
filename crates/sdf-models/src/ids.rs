//! Type-safe identifier wrappers.
//!
//! A [`Tag`] is the storage handle derived from a human-readable column or
//! tracker name. A [`KpiId`] is the caller-chosen identifier of a KPI within
//! a project.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

/// Macro to generate string-backed identifier newtypes.
macro_rules! define_key {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a key from an existing string, as-is.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_key!(Tag);
define_key!(KpiId);

static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static FORBIDDEN: OnceLock<Regex> = OnceLock::new();

impl Tag {
    /// Derives a tag from a display name.
    ///
    /// Whitespace runs become `_` and anything outside `[A-Za-z0-9_-]` is
    /// dropped, so `"Test Number 1"` becomes `"Test_Number_1"`.
    pub fn from_name(name: &str) -> Self {
        let ws = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
        let forbidden =
            FORBIDDEN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\-]").expect("valid regex"));

        let underscored = ws.replace_all(name.trim(), "_");
        Self(forbidden.replace_all(&underscored, "").into_owned())
    }
}
