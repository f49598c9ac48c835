//! Resolution Chain
//!
//! An ordered list of registries consulted as one. Index 0 has the highest
//! priority: single and keyed lookups return the first match, collection
//! lookups concatenate every member's answer in chain order.
//!
//! ```text
//! lookup_one(T)        lookup_many(T)
//!     │                    │
//!     ▼                    ▼
//! [ overlay ] ─hit─▶ T  [ overlay ] ─▶ [a1, a2] ─┐
//! [  base   ]           [  base   ] ─▶ [b1]     ─┴▶ [a1, a2, b1]
//! ```
//!
//! A chain is itself a [`ServiceRegistry`], so chains nest.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use provchain_domain::error::Result;
use provchain_domain::ports::{AsyncRelease, KeyedLookup, Reachability, ServiceRegistry};
use provchain_domain::value_objects::{into_service, Service, ServiceKey, ServiceType};
use tracing::debug;

use super::release::{release_in_order, release_in_order_async, ReleaseGuard};

/// Whether a chain is responsible for releasing its members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOwnership {
    /// Members were supplied by the caller and are never released by the chain
    Borrowed,
    /// Members were created for the chain (child scopes, overlay and base)
    /// and are released with it
    Owned,
}

/// Priority-ordered composite of registries
pub struct ResolutionChain {
    name: String,
    registries: Vec<Arc<dyn ServiceRegistry>>,
    ownership: ChainOwnership,
    released: AtomicBool,
    this: Weak<ResolutionChain>,
}

impl ResolutionChain {
    /// Chain over caller-owned registries; an empty list is allowed
    pub fn new(registries: Vec<Arc<dyn ServiceRegistry>>) -> Arc<Self> {
        Self::with_ownership(registries, ChainOwnership::Borrowed)
    }

    pub(crate) fn owning(registries: Vec<Arc<dyn ServiceRegistry>>) -> Arc<Self> {
        Self::with_ownership(registries, ChainOwnership::Owned)
    }

    fn with_ownership(
        registries: Vec<Arc<dyn ServiceRegistry>>,
        ownership: ChainOwnership,
    ) -> Arc<Self> {
        let members: Vec<&str> = registries.iter().map(|registry| registry.name()).collect();
        let name = format!("chain[{}]", members.join(", "));
        Arc::new_cyclic(|this| Self {
            name,
            registries,
            ownership,
            released: AtomicBool::new(false),
            this: this.clone(),
        })
    }

    pub fn registries(&self) -> &[Arc<dyn ServiceRegistry>] {
        &self.registries
    }

    pub fn ownership(&self) -> ChainOwnership {
        self.ownership
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    /// Whether this chain has released its members; always `false` when borrowed
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// The chain answers requests for itself without a registration
    fn self_service(&self, service_type: ServiceType) -> Option<Service> {
        if service_type.is::<ResolutionChain>() {
            self.this.upgrade().map(into_service)
        } else if service_type.is::<dyn ServiceRegistry>() {
            let this = self.this.upgrade()?;
            Some(into_service::<dyn ServiceRegistry>(this))
        } else {
            None
        }
    }

    /// Mark released; `false` if this chain was already released
    fn begin_release(&self) -> bool {
        !self.released.swap(true, Ordering::AcqRel)
    }
}

impl ServiceRegistry for ResolutionChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup_one(&self, service_type: ServiceType) -> Result<Option<Service>> {
        // A released chain answers self lookups through its members, which
        // report their own used-after-release error.
        if !self.is_released() {
            if let Some(service) = self.self_service(service_type) {
                return Ok(Some(service));
            }
        }
        for registry in &self.registries {
            if let Some(service) = registry.lookup_one(service_type)? {
                return Ok(Some(service));
            }
        }
        Ok(None)
    }

    fn lookup_many(&self, service_type: ServiceType) -> Result<Vec<Service>> {
        let mut aggregate = Vec::new();
        for registry in &self.registries {
            aggregate.extend(registry.lookup_many(service_type)?);
        }
        Ok(aggregate)
    }

    fn create_child_scope(&self) -> Result<Arc<dyn ServiceRegistry>> {
        let mut guard = ReleaseGuard::new();
        for registry in &self.registries {
            guard.hold(registry.create_child_scope()?);
        }
        let child = Self::owning(guard.disarm());
        debug!(chain = %self.name, child = %child.name, "Created child chain scope");
        Ok(child)
    }

    fn release(&self) -> Result<()> {
        if self.ownership == ChainOwnership::Borrowed || !self.begin_release() {
            return Ok(());
        }
        debug!(chain = %self.name, "Releasing owned chain members");
        release_in_order(&self.registries)
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

impl KeyedLookup for ResolutionChain {
    fn lookup_keyed(
        &self,
        service_type: ServiceType,
        key: &ServiceKey,
    ) -> Result<Option<Service>> {
        for keyed in self.registries.iter().filter_map(|registry| registry.as_keyed()) {
            if let Some(service) = keyed.lookup_keyed(service_type, key)? {
                return Ok(Some(service));
            }
        }
        Ok(None)
    }

    fn lookup_many_keyed(
        &self,
        service_type: ServiceType,
        key: &ServiceKey,
    ) -> Result<Vec<Service>> {
        let mut aggregate = Vec::new();
        for keyed in self.registries.iter().filter_map(|registry| registry.as_keyed()) {
            aggregate.extend(keyed.lookup_many_keyed(service_type, key)?);
        }
        Ok(aggregate)
    }
}

impl Reachability for ResolutionChain {
    fn is_reachable(&self, service_type: ServiceType) -> bool {
        service_type.is::<ResolutionChain>()
            || service_type.is::<dyn ServiceRegistry>()
            || self.registries.iter().any(|registry| {
                registry
                    .as_reachability()
                    .is_some_and(|reach| reach.is_reachable(service_type))
            })
    }
}

#[async_trait]
impl AsyncRelease for ResolutionChain {
    async fn release_async(&self) -> Result<()> {
        if self.ownership == ChainOwnership::Borrowed || !self.begin_release() {
            return Ok(());
        }
        debug!(chain = %self.name, "Releasing owned chain members asynchronously");
        release_in_order_async(&self.registries).await
    }
}

impl std::fmt::Debug for ResolutionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionChain")
            .field("name", &self.name)
            .field("ownership", &self.ownership)
            .field("released", &self.is_released())
            .finish()
    }
}
