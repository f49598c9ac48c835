//! Registration entries and release hooks

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use provchain_domain::error::Result;
use provchain_domain::value_objects::{Service, ServiceKey, ServiceType};

use super::lifetime::Lifetime;
use super::provider::ServiceProvider;

/// Factory producing an erased service from the resolving provider
pub(crate) type Factory = Arc<dyn Fn(&ServiceProvider) -> Result<Service> + Send + Sync>;

/// Hook run when a provider or one of its scopes is released
pub(crate) type ReleaseHook = Arc<dyn Fn(&ReleaseEvent) + Send + Sync>;

/// Hook awaited when a provider or one of its scopes is released asynchronously
pub(crate) type AsyncReleaseHook =
    Arc<dyn Fn(ReleaseEvent) -> BoxFuture<'static, ()> + Send + Sync>;

/// How a registration produces its value
#[derive(Clone)]
pub(crate) enum Activation {
    /// Pre-built value, shared as-is
    Instance(Service),
    /// Built on demand and cached according to the lifetime
    Factory(Factory),
}

/// One registration in a [`super::ServiceCollection`]
#[derive(Clone)]
pub(crate) struct ServiceDescriptor {
    pub(crate) service_type: ServiceType,
    pub(crate) key: Option<ServiceKey>,
    pub(crate) lifetime: Lifetime,
    pub(crate) activation: Activation,
}

impl ServiceDescriptor {
    /// True when this entry answers a lookup for `service_type` under `key`
    ///
    /// `None` matches only unkeyed entries, `Some(key)` only entries with that key.
    pub(crate) fn matches(&self, service_type: ServiceType, key: Option<&ServiceKey>) -> bool {
        self.service_type == service_type && self.key.as_ref() == key
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let activation = match self.activation {
            Activation::Instance(_) => "instance",
            Activation::Factory(_) => "factory",
        };
        f.debug_struct("ServiceDescriptor")
            .field("service_type", &self.service_type)
            .field("key", &self.key)
            .field("lifetime", &self.lifetime)
            .field("activation", &activation)
            .finish()
    }
}

/// Passed to release hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEvent {
    /// Name of the provider or scope being released
    pub registry: String,
    /// Whether the released provider is the root built from the collection
    pub is_root: bool,
}
