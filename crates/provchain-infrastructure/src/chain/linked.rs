//! Linked Scope
//!
//! Binds an overlay registry and a base child scope behind one
//! [`ResolutionChain`] (overlay first) and tears both down together:
//! overlay, then base, exactly once, on either release path or on drop.
//!
//! The chain owns both members, so releasing the scope and releasing
//! [`LinkedScope::provider`] are the same operation.

use std::sync::Arc;

use provchain_domain::error::Result;
use provchain_domain::ports::{AsyncRelease, KeyedLookup, Reachability, ServiceRegistry};
use provchain_domain::value_objects::{Service, ServiceType};
use tracing::debug;

use super::resolution::ResolutionChain;

/// Paired lifetime of an overlay registry and a base scope
///
/// After release, every lookup through [`LinkedScope::provider`] (self
/// lookups included) surfaces the used-after-release error of the overlay
/// registry unchanged.
pub struct LinkedScope {
    /// Owning chain over `[overlay, base]`, the release order
    provider: Arc<ResolutionChain>,
}

impl LinkedScope {
    pub(crate) fn new(overlay: Arc<dyn ServiceRegistry>, base: Arc<dyn ServiceRegistry>) -> Self {
        let provider = ResolutionChain::owning(vec![overlay, base]);
        debug!(scope = provider.name(), "Linked overlay and base scope");
        Self { provider }
    }

    /// The composite chain callers resolve from
    pub fn provider(&self) -> &Arc<ResolutionChain> {
        &self.provider
    }

    pub fn overlay(&self) -> &Arc<dyn ServiceRegistry> {
        &self.provider.registries()[0]
    }

    pub fn base(&self) -> &Arc<dyn ServiceRegistry> {
        &self.provider.registries()[1]
    }

    pub fn is_released(&self) -> bool {
        self.provider.is_released()
    }
}

impl ServiceRegistry for LinkedScope {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn lookup_one(&self, service_type: ServiceType) -> Result<Option<Service>> {
        self.provider.lookup_one(service_type)
    }

    fn lookup_many(&self, service_type: ServiceType) -> Result<Vec<Service>> {
        self.provider.lookup_many(service_type)
    }

    fn create_child_scope(&self) -> Result<Arc<dyn ServiceRegistry>> {
        self.provider.create_child_scope()
    }

    /// Release the overlay, then the base scope
    ///
    /// Both are attempted even if the first fails; the first failure is returned.
    fn release(&self) -> Result<()> {
        self.provider.release()
    }

    fn as_keyed(&self) -> Option<&dyn KeyedLookup> {
        Some(self.provider.as_ref())
    }

    fn as_reachability(&self) -> Option<&dyn Reachability> {
        Some(self.provider.as_ref())
    }

    fn as_async_release(&self) -> Option<&dyn AsyncRelease> {
        Some(self.provider.as_ref())
    }
}

impl Drop for LinkedScope {
    fn drop(&mut self) {
        // Failures are logged by the chain; drop cannot report them.
        let _ = self.provider.release();
    }
}

impl std::fmt::Debug for LinkedScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedScope")
            .field("provider", &self.provider.name())
            .field("released", &self.is_released())
            .finish()
    }
}
