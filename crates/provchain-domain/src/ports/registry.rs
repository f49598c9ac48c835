//! Registry Port
//!
//! The contract every backing registry satisfies, plus the optional
//! capabilities a registry may expose. Capabilities are probed through the
//! `as_*` accessors; a registry that returns `None` simply lacks the
//! capability, which callers treat as "no answer" rather than an error.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::{Service, ServiceKey, ServiceType};

/// A backing registration table
///
/// # Example
///
/// ```no_run
/// use provchain_domain::ports::{Resolver, ServiceRegistry};
/// use std::sync::Arc;
///
/// fn describe(registry: Arc<dyn ServiceRegistry>) -> provchain_domain::Result<()> {
///     let scope = registry.create_child_scope()?;
///     let names: Vec<Arc<String>> = scope.get_all::<String>()?;
///     println!("{} resolves {} names", scope.name(), names.len());
///     scope.release()
/// }
/// ```
pub trait ServiceRegistry: Send + Sync {
    /// Name used in diagnostics and disposed errors
    fn name(&self) -> &str;

    /// Single-value lookup; `Ok(None)` when the type is not registered
    fn lookup_one(&self, service_type: ServiceType) -> Result<Option<Service>>;

    /// Every value registered for the element type, possibly empty
    fn lookup_many(&self, service_type: ServiceType) -> Result<Vec<Service>>;

    /// Create a child lifetime scope owned by the caller
    fn create_child_scope(&self) -> Result<Arc<dyn ServiceRegistry>>;

    /// Release everything this registry created
    fn release(&self) -> Result<()>;

    fn as_keyed(&self) -> Option<&dyn KeyedLookup> {
        None
    }

    fn as_reachability(&self) -> Option<&dyn Reachability> {
        None
    }

    fn as_async_release(&self) -> Option<&dyn AsyncRelease> {
        None
    }
}

/// Lookup by type and key
pub trait KeyedLookup: Send + Sync {
    fn lookup_keyed(&self, service_type: ServiceType, key: &ServiceKey)
        -> Result<Option<Service>>;

    /// Every value registered for the element type under `key`, possibly empty
    fn lookup_many_keyed(&self, service_type: ServiceType, key: &ServiceKey)
        -> Result<Vec<Service>>;
}

/// "Is this type registered anywhere reachable from here"
pub trait Reachability: Send + Sync {
    fn is_reachable(&self, service_type: ServiceType) -> bool;
}

/// Asynchronous teardown
#[async_trait]
pub trait AsyncRelease: Send + Sync {
    async fn release_async(&self) -> Result<()>;
}

/// Release a registry through its async path, falling back to `release`
pub async fn release_registry(registry: &dyn ServiceRegistry) -> Result<()> {
    match registry.as_async_release() {
        Some(releaser) => releaser.release_async().await,
        None => registry.release(),
    }
}
