//! Typed accessors over any registry
//!
//! `Resolver` is the call boundary where a typed request is turned into a
//! [`ServiceRequest`] and the erased answer is turned back into `Arc<T>`.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ports::registry::ServiceRegistry;
use crate::value_objects::{
    downcast_service, Resolution, ServiceKey, ServiceRequest, ServiceType,
};

/// Typed lookup methods available on every [`ServiceRegistry`]
pub trait Resolver: ServiceRegistry {
    /// Route a classified request to the matching registry operation
    fn resolve(&self, request: &ServiceRequest) -> Result<Resolution> {
        match request {
            ServiceRequest::Single(service_type) => {
                self.lookup_one(*service_type).map(Resolution::One)
            }
            ServiceRequest::Keyed(service_type, key) => match self.as_keyed() {
                Some(keyed) => keyed.lookup_keyed(*service_type, key).map(Resolution::One),
                None => Ok(Resolution::One(None)),
            },
            ServiceRequest::Many(service_type) => {
                self.lookup_many(*service_type).map(Resolution::Many)
            }
            ServiceRequest::KeyedMany(service_type, key) => match self.as_keyed() {
                Some(keyed) => keyed
                    .lookup_many_keyed(*service_type, key)
                    .map(Resolution::Many),
                None => Ok(Resolution::Many(Vec::new())),
            },
            ServiceRequest::SelfReference => self
                .lookup_one(ServiceType::of::<dyn ServiceRegistry>())
                .map(Resolution::One),
        }
    }

    /// Best-effort lookup of `T`
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        self.resolve(&ServiceRequest::single::<T>())?
            .into_one()
            .map(|service| downcast_service::<T>(&service))
            .transpose()
    }

    /// Lookup of `T` that fails with `RequiredServiceMissing` when absent
    fn get_required<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.get::<T>()?
            .ok_or_else(|| Error::required_service_missing(std::any::type_name::<T>()))
    }

    /// Best-effort keyed lookup; registries without keyed support yield `None`
    fn get_keyed<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
    ) -> Result<Option<Arc<T>>> {
        self.resolve(&ServiceRequest::keyed::<T>(key))?
            .into_one()
            .map(|service| downcast_service::<T>(&service))
            .transpose()
    }

    /// Keyed lookup that fails with `RequiredKeyedServiceMissing` when absent
    fn get_required_keyed<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
    ) -> Result<Arc<T>> {
        let key = key.into();
        self.get_keyed::<T>(key.clone())?.ok_or_else(|| {
            Error::required_keyed_service_missing(std::any::type_name::<T>(), key)
        })
    }

    /// Every registered `T`, in priority order
    fn get_all<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<Arc<T>>> {
        self.resolve(&ServiceRequest::many::<T>())?
            .into_many()
            .iter()
            .map(downcast_service::<T>)
            .collect()
    }

    /// Every `T` registered under `key`, in priority order
    ///
    /// Registries without keyed support contribute nothing.
    fn get_all_keyed<T: ?Sized + Send + Sync + 'static>(
        &self,
        key: impl Into<ServiceKey>,
    ) -> Result<Vec<Arc<T>>> {
        self.resolve(&ServiceRequest::keyed_many::<T>(key))?
            .into_many()
            .iter()
            .map(downcast_service::<T>)
            .collect()
    }

    /// Reachability of `T`; registries without the capability report `false`
    fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.as_reachability()
            .is_some_and(|reach| reach.is_reachable(ServiceType::of::<T>()))
    }
}

impl<R: ServiceRegistry + ?Sized> Resolver for R {}
