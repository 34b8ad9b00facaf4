//! Route bindings and the route guard.
//!
//! The application exposes one public entry point and one protected
//! area. Everything under [`PROTECTED`] passes through [`guard`].

mod guard;

pub use guard::{guard, GuardOutcome};

use std::fmt;

use super::foundation::ValidationError;

/// Public entry point; unauthenticated visitors land here.
pub const PUBLIC_ENTRY: &str = "/";

/// Protected document overview.
pub const PROTECTED: &str = "/protected";

/// Local path to return to after a completed login.
///
/// Only same-origin absolute paths are accepted so the login callback
/// cannot be turned into an open redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTo(String);

impl ReturnTo {
    pub fn parse(path: impl Into<String>) -> Result<Self, ValidationError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ValidationError::empty_field("return_to"));
        }
        if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
            return Err(ValidationError::invalid_format(
                "return_to",
                "must be a local absolute path",
            ));
        }
        if path.chars().any(char::is_control) {
            return Err(ValidationError::invalid_format(
                "return_to",
                "must not contain control characters",
            ));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReturnTo {
    fn default() -> Self {
        Self(PROTECTED.to_string())
    }
}

impl fmt::Display for ReturnTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
