//! Registration sink
//!
//! A [`ServiceCollection`] records registrations and release hooks, then
//! compiles into an immutable [`ServiceProvider`].
//!
//! ```
//! use provchain_domain::ports::Resolver;
//! use provchain_infrastructure::registry::ServiceCollection;
//! use std::sync::Arc;
//!
//! let mut services = ServiceCollection::named("app");
//! services.add_instance(Arc::new(String::from("postgres://localhost")));
//! services.add_transient(|provider| {
//!     let url = provider.get_required::<String>()?;
//!     Ok(Arc::new(url.len()))
//! });
//!
//! let provider = services.build(false).unwrap();
//! assert_eq!(*provider.get_required::<usize>().unwrap(), 20);
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use provchain_domain::error::Result;
use provchain_domain::value_objects::{
    into_service, BuildOptions, Service, ServiceKey, ServiceType,
};

use super::descriptor::{
    Activation, AsyncReleaseHook, Factory, ReleaseEvent, ReleaseHook, ServiceDescriptor,
};
use super::lifetime::Lifetime;
use super::provider::ServiceProvider;
use crate::constants::DEFAULT_REGISTRY_NAME;

/// Ordered list of registrations
#[derive(Clone, Default)]
pub struct ServiceCollection {
    name: Option<String>,
    descriptors: Vec<ServiceDescriptor>,
    release_hooks: Vec<ReleaseHook>,
    async_release_hooks: Vec<AsyncReleaseHook>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection whose provider reports `name` in diagnostics
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_REGISTRY_NAME)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Register a pre-built value
    pub fn add_instance<T: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<T>) -> &mut Self {
        self.push::<T>(None, Lifetime::Singleton, Activation::Instance(into_service(value)))
    }

    /// Register a factory whose result is shared by the whole provider tree
    pub fn add_singleton<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.push::<T>(None, Lifetime::Singleton, Activation::Factory(erase(factory)))
    }

    /// Register a factory whose result is cached once per scope
    pub fn add_scoped<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.push::<T>(None, Lifetime::Scoped, Activation::Factory(erase(factory)))
    }

    /// Register a factory invoked on every lookup
    pub fn add_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.push::<T>(None, Lifetime::Transient, Activation::Factory(erase(factory)))
    }

    pub fn add_keyed_instance<T: ?Sized + Send + Sync + 'static>(
        &mut self,
        key: impl Into<ServiceKey>,
        value: Arc<T>,
    ) -> &mut Self {
        self.push::<T>(
            Some(key.into()),
            Lifetime::Singleton,
            Activation::Instance(into_service(value)),
        )
    }

    pub fn add_keyed_singleton<T, F>(&mut self, key: impl Into<ServiceKey>, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.push::<T>(
            Some(key.into()),
            Lifetime::Singleton,
            Activation::Factory(erase(factory)),
        )
    }

    pub fn add_keyed_scoped<T, F>(&mut self, key: impl Into<ServiceKey>, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.push::<T>(
            Some(key.into()),
            Lifetime::Scoped,
            Activation::Factory(erase(factory)),
        )
    }

    /// Run `hook` whenever the built provider or any of its scopes is released
    pub fn on_release<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&ReleaseEvent) + Send + Sync + 'static,
    {
        self.release_hooks.push(Arc::new(hook));
        self
    }

    /// Await `hook` on the asynchronous release path only
    pub fn on_release_async<F, Fut>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(ReleaseEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.async_release_hooks
            .push(Arc::new(move |event: ReleaseEvent| -> BoxFuture<'static, ()> {
                hook(event).boxed()
            }));
        self
    }

    /// Compile into a root provider
    ///
    /// Accepts a full [`BuildOptions`] or a bare `bool` (scope validation).
    pub fn build(self, options: impl Into<BuildOptions>) -> Result<Arc<ServiceProvider>> {
        let name = self.name().to_string();
        ServiceProvider::build(
            name,
            self.descriptors,
            self.release_hooks,
            self.async_release_hooks,
            options.into(),
        )
    }

    fn push<T: ?Sized + 'static>(
        &mut self,
        key: Option<ServiceKey>,
        lifetime: Lifetime,
        activation: Activation,
    ) -> &mut Self {
        self.descriptors.push(ServiceDescriptor {
            service_type: ServiceType::of::<T>(),
            key,
            lifetime,
            activation,
        });
        self
    }
}

impl std::fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("name", &self.name())
            .field("descriptors", &self.descriptors)
            .field("release_hooks", &self.release_hooks.len())
            .field("async_release_hooks", &self.async_release_hooks.len())
            .finish()
    }
}

fn erase<T, F>(factory: F) -> Factory
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
{
    Arc::new(move |provider: &ServiceProvider| -> Result<Service> {
        factory(provider).map(into_service)
    })
}
