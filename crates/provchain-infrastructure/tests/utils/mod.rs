//! Shared test doubles
//!
//! `PlainRegistry` implements only the required part of the registry
//! contract (no keyed lookup, no reachability, no async release) and records
//! every release into a shared log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use provchain_domain::value_objects::into_service;
use provchain_domain::{Error, Result, Service, ServiceRegistry, ServiceType};
use provchain_infrastructure::registry::{ServiceCollection, ServiceProvider};

/// Names of released registries, in release order
#[derive(Clone, Default)]
pub struct ReleaseLog(Arc<Mutex<Vec<String>>>);

impl ReleaseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: impl Into<String>) {
        self.0.lock().unwrap().push(name.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct PlainRegistry {
    name: String,
    entries: Vec<(ServiceType, Service)>,
    log: ReleaseLog,
    fail_release: bool,
    fail_child_scope: bool,
    released: AtomicBool,
}

impl PlainRegistry {
    pub fn new(name: &str, log: &ReleaseLog) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
            log: log.clone(),
            fail_release: false,
            fail_child_scope: false,
            released: AtomicBool::new(false),
        }
    }

    pub fn with<T: ?Sized + Send + Sync + 'static>(mut self, value: Arc<T>) -> Self {
        self.entries
            .push((ServiceType::of::<T>(), into_service(value)));
        self
    }

    /// Release records itself and then fails; children inherit this
    pub fn failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    pub fn failing_child_scope(mut self) -> Self {
        self.fail_child_scope = true;
        self
    }

    pub fn shared(self) -> Arc<dyn ServiceRegistry> {
        Arc::new(self)
    }

    fn ensure_active(&self) -> Result<()> {
        if self.released.load(Ordering::SeqCst) {
            return Err(Error::disposed(&self.name));
        }
        Ok(())
    }
}

impl ServiceRegistry for PlainRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup_one(&self, service_type: ServiceType) -> Result<Option<Service>> {
        self.ensure_active()?;
        Ok(self
            .entries
            .iter()
            .find(|(ty, _)| *ty == service_type)
            .map(|(_, service)| Arc::clone(service)))
    }

    fn lookup_many(&self, service_type: ServiceType) -> Result<Vec<Service>> {
        self.ensure_active()?;
        Ok(self
            .entries
            .iter()
            .filter(|(ty, _)| *ty == service_type)
            .map(|(_, service)| Arc::clone(service))
            .collect())
    }

    fn create_child_scope(&self) -> Result<Arc<dyn ServiceRegistry>> {
        self.ensure_active()?;
        if self.fail_child_scope {
            return Err(Error::generic(format!("{} refused a child scope", self.name)));
        }
        Ok(Arc::new(Self {
            name: format!("{}/child", self.name),
            entries: self.entries.clone(),
            log: self.log.clone(),
            fail_release: self.fail_release,
            fail_child_scope: false,
            released: AtomicBool::new(false),
        }))
    }

    fn release(&self) -> Result<()> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.log.record(&self.name);
        if self.fail_release {
            return Err(Error::infrastructure(format!("{} failed to release", self.name)));
        }
        Ok(())
    }
}

/// Provider registering `value`, logging every scope release under its name
pub fn provider_with<T: ?Sized + Send + Sync + 'static>(
    name: &str,
    value: Arc<T>,
    log: &ReleaseLog,
) -> Arc<ServiceProvider> {
    let mut services = ServiceCollection::named(name);
    services.add_instance(value);
    let log = log.clone();
    services.on_release(move |event| log.record(&event.registry));
    services.build(false).unwrap()
}

pub fn shared(provider: Arc<ServiceProvider>) -> Arc<dyn ServiceRegistry> {
    provider
}
