//! Best-effort release of several registries

use std::sync::Arc;

use provchain_domain::error::{Error, Result};
use provchain_domain::ports::{release_registry, ServiceRegistry};
use tracing::warn;

/// Release every registry in order
///
/// A failure does not stop the remaining releases. Every failure is logged;
/// the first one is returned unchanged.
pub(crate) fn release_in_order(registries: &[Arc<dyn ServiceRegistry>]) -> Result<()> {
    let mut first_error: Option<Error> = None;
    for registry in registries {
        if let Err(error) = registry.release() {
            warn!(registry = registry.name(), error = %error, "Release failed");
            first_error.get_or_insert(error);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Asynchronous counterpart of [`release_in_order`]
///
/// Each registry is awaited through its async path when it has one.
pub(crate) async fn release_in_order_async(registries: &[Arc<dyn ServiceRegistry>]) -> Result<()> {
    let mut first_error: Option<Error> = None;
    for registry in registries {
        if let Err(error) = release_registry(registry.as_ref()).await {
            warn!(registry = registry.name(), error = %error, "Async release failed");
            first_error.get_or_insert(error);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Releases the registries it holds when dropped, unless disarmed
///
/// Covers every exit path of a construction step: `?` returns and panics
/// unwinding through the guarded region alike.
#[must_use = "the guard releases its registries as soon as it is dropped"]
pub(crate) struct ReleaseGuard {
    registries: Vec<Arc<dyn ServiceRegistry>>,
}

impl ReleaseGuard {
    pub(crate) fn new() -> Self {
        Self {
            registries: Vec::new(),
        }
    }

    pub(crate) fn hold(&mut self, registry: Arc<dyn ServiceRegistry>) {
        self.registries.push(registry);
    }

    /// Keep the registries alive past the guard without releasing them
    pub(crate) fn defuse(mut self) {
        self.registries.clear();
    }

    /// Hand the registries back to the caller without releasing them
    pub(crate) fn disarm(mut self) -> Vec<Arc<dyn ServiceRegistry>> {
        std::mem::take(&mut self.registries)
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if self.registries.is_empty() {
            return;
        }
        tracing::debug!(count = self.registries.len(), "Releasing partially constructed scopes");
        // Failures are logged inside release_in_order; the original error wins.
        let _ = release_in_order(&self.registries);
    }
}
