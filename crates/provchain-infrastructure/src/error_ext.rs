//! Context for foreign errors
//!
//! Configuration loading meets three foreign error types: figment
//! extraction, TOML serialization and file IO. These helpers fold them into
//! the domain [`Error`] with a message naming the step that failed, keeping
//! the foreign error as the source.

use std::fmt::Display;
use std::path::Path;

use provchain_domain::error::{Error, Result};

/// Attach the failed step to a foreign error
///
/// ```ignore
/// use provchain_infrastructure::error_ext::ErrorContext;
///
/// let config: ProvchainConfig = figment.extract().config_context("Failed to extract configuration")?;
/// std::fs::write(&path, text).file_context("Failed to write config file", &path)?;
/// ```
pub trait ErrorContext<T> {
    /// A configuration step failed
    fn config_context(self, step: impl Display) -> Result<T>;

    /// A filesystem step on `path` failed
    fn file_context(self, step: &str, path: &Path) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn config_context(self, step: impl Display) -> Result<T> {
        self.map_err(|err| Error::configuration_with_source(format!("{step}: {err}"), err))
    }

    fn file_context(self, step: &str, path: &Path) -> Result<T> {
        self.map_err(|err| Error::Infrastructure {
            message: format!("{step} {}: {err}", path.display()),
            source: Some(Box::new(err)),
        })
    }
}
