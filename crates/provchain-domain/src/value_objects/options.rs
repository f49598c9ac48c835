//! Registry build options

use serde::{Deserialize, Serialize};

/// Options handed to a registry's build step
///
/// The resolution chain passes these through untouched; only the registry
/// being built interprets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Reject scoped services resolved from a root registry
    pub validate_scopes: bool,

    /// Construct every singleton while building, failing the build on error
    pub validate_on_build: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict scope validation
    pub fn with_validate_scopes(mut self, enabled: bool) -> Self {
        self.validate_scopes = enabled;
        self
    }

    /// Set eager build-time validation
    pub fn with_validate_on_build(mut self, enabled: bool) -> Self {
        self.validate_on_build = enabled;
        self
    }
}

impl From<bool> for BuildOptions {
    /// A bare flag toggles scope validation only
    fn from(validate_scopes: bool) -> Self {
        Self {
            validate_scopes,
            ..Self::default()
        }
    }
}
