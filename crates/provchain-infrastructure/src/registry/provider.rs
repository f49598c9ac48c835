//! Built registry
//!
//! A [`ServiceProvider`] is the immutable result of
//! [`super::ServiceCollection::build`]. The root provider caches singletons;
//! every child scope shares the root's registrations and singletons and
//! keeps its own cache of scoped instances.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use dashmap::DashMap;
use provchain_domain::error::{Error, Result};
use provchain_domain::ports::{AsyncRelease, KeyedLookup, Reachability, ServiceRegistry};
use provchain_domain::value_objects::{
    into_service, BuildOptions, Service, ServiceKey, ServiceType,
};
use tracing::debug;

use super::descriptor::{
    Activation, AsyncReleaseHook, ReleaseEvent, ReleaseHook, ServiceDescriptor,
};
use super::lifetime::Lifetime;

/// State shared between a root provider and all of its scopes
struct Registrations {
    descriptors: Vec<ServiceDescriptor>,
    options: BuildOptions,
    release_hooks: Vec<ReleaseHook>,
    async_release_hooks: Vec<AsyncReleaseHook>,
    scope_counter: AtomicUsize,
}

/// Root provider or child scope
pub struct ServiceProvider {
    name: String,
    registrations: Arc<Registrations>,
    /// `None` for the root itself
    root: Option<Arc<ServiceProvider>>,
    /// Singletons on the root, scoped instances on a child scope
    instances: DashMap<usize, Service>,
    released: AtomicBool,
    this: Weak<ServiceProvider>,
}

impl ServiceProvider {
    pub(crate) fn build(
        name: String,
        descriptors: Vec<ServiceDescriptor>,
        release_hooks: Vec<ReleaseHook>,
        async_release_hooks: Vec<AsyncReleaseHook>,
        options: BuildOptions,
    ) -> Result<Arc<Self>> {
        let registrations = Arc::new(Registrations {
            descriptors,
            options,
            release_hooks,
            async_release_hooks,
            scope_counter: AtomicUsize::new(0),
        });
        let root = Arc::new_cyclic(|this| Self {
            name,
            registrations,
            root: None,
            instances: DashMap::new(),
            released: AtomicBool::new(false),
            this: this.clone(),
        });

        if options.validate_on_build {
            root.construct_singletons()?;
        }

        debug!(
            registry = %root.name,
            registrations = root.registrations.descriptors.len(),
            validate_scopes = options.validate_scopes,
            validate_on_build = options.validate_on_build,
            "Built service provider"
        );
        Ok(root)
    }

    pub fn is_root(&self) -> bool {
        self.root.is_none()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_released() {
            return Err(Error::disposed(&self.name));
        }
        Ok(())
    }

    fn root_provider(&self) -> &ServiceProvider {
        self.root.as_deref().unwrap_or(self)
    }

    fn root_arc(&self) -> Result<Arc<ServiceProvider>> {
        match &self.root {
            Some(root) => Ok(Arc::clone(root)),
            None => self
                .this
                .upgrade()
                .ok_or_else(|| Error::disposed(&self.name)),
        }
    }

    /// Providers resolve themselves without an explicit registration
    fn self_service(&self, service_type: ServiceType) -> Option<Service> {
        let this = self.this.upgrade()?;
        if service_type.is::<ServiceProvider>() {
            Some(into_service(this))
        } else if service_type.is::<dyn ServiceRegistry>() {
            Some(into_service::<dyn ServiceRegistry>(this))
        } else {
            None
        }
    }

    fn last_match(&self, service_type: ServiceType, key: Option<&ServiceKey>) -> Option<usize> {
        self.registrations
            .descriptors
            .iter()
            .rposition(|descriptor| descriptor.matches(service_type, key))
    }

    /// Every matching entry, activated in registration order
    fn all_matches(
        &self,
        service_type: ServiceType,
        key: Option<&ServiceKey>,
    ) -> Result<Vec<Service>> {
        self.registrations
            .descriptors
            .iter()
            .enumerate()
            .filter(|(_, descriptor)| descriptor.matches(service_type, key))
            .map(|(index, _)| self.activate(index))
            .collect()
    }

    fn construct_singletons(&self) -> Result<()> {
        for (index, descriptor) in self.registrations.descriptors.iter().enumerate() {
            if descriptor.lifetime == Lifetime::Singleton {
                self.activate(index)?;
            }
        }
        Ok(())
    }

    fn activate(&self, index: usize) -> Result<Service> {
        let descriptor = &self.registrations.descriptors[index];
        match descriptor.lifetime {
            Lifetime::Singleton => self.root_provider().cached(index, descriptor),
            Lifetime::Scoped => {
                if self.is_root() && self.registrations.options.validate_scopes {
                    return Err(Error::scope_violation(
                        descriptor.service_type.name(),
                        "scoped service resolved from the root provider",
                    ));
                }
                self.cached(index, descriptor)
            }
            Lifetime::Transient => self.construct(descriptor),
        }
    }

    fn cached(&self, index: usize, descriptor: &ServiceDescriptor) -> Result<Service> {
        self.ensure_active()?;
        if let Some(existing) = self.instances.get(&index) {
            return Ok(Arc::clone(existing.value()));
        }
        // The factory may resolve other services from this map, so no
        // shard lock is held while it runs.
        let created = self.construct(descriptor)?;
        Ok(Arc::clone(self.instances.entry(index).or_insert(created).value()))
    }

    fn construct(&self, descriptor: &ServiceDescriptor) -> Result<Service> {
        match &descriptor.activation {
            Activation::Instance(service) => Ok(Arc::clone(service)),
            Activation::Factory(factory) => factory(self),
        }
    }

    /// Flip to released and drop cached instances; `None` if already released
    fn begin_release(&self) -> Option<ReleaseEvent> {
        if self.released.swap(true, Ordering::AcqRel) {
            return None;
        }
        self.instances.clear();
        debug!(registry = %self.name, root = self.is_root(), "Released service provider");
        Some(ReleaseEvent {
            registry: self.name.clone(),
            is_root: self.is_root(),
        })
    }

    fn run_release_hooks(&self, event: &ReleaseEvent) {
        for hook in &self.registrations.release_hooks {
            hook(event);
        }
    }
}

impl ServiceRegistry for ServiceProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup_one(&self, service_type: ServiceType) -> Result<Option<Service>> {
        self.ensure_active()?;
        if let Some(service) = self.self_service(service_type) {
            return Ok(Some(service));
        }
        self.last_match(service_type, None)
            .map(|index| self.activate(index))
            .transpose()
    }

    fn lookup_many(&self, service_type: ServiceType) -> Result<Vec<Service>> {
        self.ensure_active()?;
        self.all_matches(service_type, None)
    }

    fn create_child_scope(&self) -> Result<Arc<dyn ServiceRegistry>> {
        self.ensure_active()?;
        let root = self.root_arc()?;
        let ordinal = self.registrations.scope_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let name = format!("{}/scope-{ordinal}", root.name);
        let scope = Arc::new_cyclic(|this| Self {
            name,
            registrations: Arc::clone(&self.registrations),
            root: Some(root),
            instances: DashMap::new(),
            released: AtomicBool::new(false),
            this: this.clone(),
        });
        debug!(registry = %scope.name, "Created child scope");
        Ok(scope)
    }

    fn release(&self) -> Result<()> {
        if let Some(event) = self.begin_release() {
            self.run_release_hooks(&event);
        }
        Ok(())
    }

    fn as_keyed(&self) -> Option<&dyn KeyedLookup> {
        Some(self)
    }

    fn as_reachability(&self) -> Option<&dyn Reachability> {
        Some(self)
    }

    fn as_async_release(&self) -> Option<&dyn AsyncRelease> {
        Some(self)
    }
}

impl KeyedLookup for ServiceProvider {
    fn lookup_keyed(
        &self,
        service_type: ServiceType,
        key: &ServiceKey,
    ) -> Result<Option<Service>> {
        self.ensure_active()?;
        self.last_match(service_type, Some(key))
            .map(|index| self.activate(index))
            .transpose()
    }

    fn lookup_many_keyed(
        &self,
        service_type: ServiceType,
        key: &ServiceKey,
    ) -> Result<Vec<Service>> {
        self.ensure_active()?;
        self.all_matches(service_type, Some(key))
    }
}

impl Reachability for ServiceProvider {
    fn is_reachable(&self, service_type: ServiceType) -> bool {
        service_type.is::<ServiceProvider>()
            || service_type.is::<dyn ServiceRegistry>()
            || self
                .registrations
                .descriptors
                .iter()
                .any(|descriptor| descriptor.service_type == service_type)
    }
}

#[async_trait]
impl AsyncRelease for ServiceProvider {
    async fn release_async(&self) -> Result<()> {
        if let Some(event) = self.begin_release() {
            self.run_release_hooks(&event);
            for hook in &self.registrations.async_release_hooks {
                hook(event.clone()).await;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("name", &self.name)
            .field("root", &self.is_root())
            .field("registrations", &self.registrations.descriptors.len())
            .field("cached", &self.instances.len())
            .field("released", &self.is_released())
            .finish()
    }
}
