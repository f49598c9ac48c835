//! Tagged lookup requests
//!
//! A request is classified once, at the call boundary, instead of being
//! inspected at runtime by each registry.

use crate::ports::ServiceRegistry;
use crate::value_objects::{Service, ServiceKey, ServiceType};

/// A classified lookup request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceRequest {
    /// One value of the given type; first match in priority order wins
    Single(ServiceType),
    /// One value registered under the given key
    Keyed(ServiceType, ServiceKey),
    /// Every value registered for the element type, aggregated
    Many(ServiceType),
    /// Every value registered for the element type under the given key, aggregated
    KeyedMany(ServiceType, ServiceKey),
    /// The registry abstraction itself
    SelfReference,
}

impl ServiceRequest {
    /// Single-value request for `T`
    ///
    /// Asking for `dyn ServiceRegistry` classifies as [`ServiceRequest::SelfReference`].
    pub fn single<T: ?Sized + 'static>() -> Self {
        let service_type = ServiceType::of::<T>();
        if service_type.is::<dyn ServiceRegistry>() {
            Self::SelfReference
        } else {
            Self::Single(service_type)
        }
    }

    pub fn keyed<T: ?Sized + 'static>(key: impl Into<ServiceKey>) -> Self {
        Self::Keyed(ServiceType::of::<T>(), key.into())
    }

    /// Collection request for element type `T`
    pub fn many<T: ?Sized + 'static>() -> Self {
        Self::Many(ServiceType::of::<T>())
    }

    /// Collection request for element type `T` registered under `key`
    pub fn keyed_many<T: ?Sized + 'static>(key: impl Into<ServiceKey>) -> Self {
        Self::KeyedMany(ServiceType::of::<T>(), key.into())
    }

    /// The requested type, if the request names one
    pub fn service_type(&self) -> Option<ServiceType> {
        match self {
            Self::Single(ty) | Self::Keyed(ty, _) | Self::Many(ty) | Self::KeyedMany(ty, _) => {
                Some(*ty)
            }
            Self::SelfReference => None,
        }
    }
}

/// Outcome of a [`ServiceRequest`]
pub enum Resolution {
    /// Answer to a single, keyed or self-reference request
    One(Option<Service>),
    /// Answer to a plain or keyed collection request, in priority order
    Many(Vec<Service>),
}

impl Resolution {
    /// The single value, or the first aggregated one
    pub fn into_one(self) -> Option<Service> {
        match self {
            Self::One(service) => service,
            Self::Many(services) => services.into_iter().next(),
        }
    }

    /// All values; a single answer becomes a zero- or one-element list
    pub fn into_many(self) -> Vec<Service> {
        match self {
            Self::One(service) => service.into_iter().collect(),
            Self::Many(services) => services,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(service) => service.is_none(),
            Self::Many(services) => services.is_empty(),
        }
    }
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::One(service) => f
                .debug_tuple("One")
                .field(&service.as_ref().map(|_| ".."))
                .finish(),
            Self::Many(services) => f.debug_tuple("Many").field(&services.len()).finish(),
        }
    }
}
