//! Service identity value objects
//!
//! A registry stores every value as a [`Service`]: a type-erased `Arc<T>`
//! boxed behind `dyn Any`. Wrapping the `Arc<T>` rather than `T` keeps
//! unsized targets such as `dyn Trait` resolvable.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Type-erased service value held by a registry
pub type Service = Arc<dyn Any + Send + Sync>;

/// Wrap a shared value so it can be stored in a registry
pub fn into_service<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Service {
    Arc::new(value)
}

/// Recover the typed `Arc<T>` from a stored service
pub fn downcast_service<T: ?Sized + Send + Sync + 'static>(service: &Service) -> Result<Arc<T>> {
    (**service)
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| Error::type_mismatch(std::any::type_name::<T>()))
}

/// Runtime identity of a requested service type
///
/// Equality and hashing use the `TypeId` only; the name is kept for
/// diagnostics and error messages.
#[derive(Clone, Copy)]
pub struct ServiceType {
    id: TypeId,
    name: &'static str,
}

impl ServiceType {
    /// Identity of `T` (which may be a trait object)
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether this identity denotes `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceType").field(&self.name).finish()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Key distinguishing several registrations of the same type
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(Arc<str>);

impl ServiceKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ServiceKey {
    fn from(key: String) -> Self {
        Self(Arc::from(key))
    }
}

impl From<&ServiceKey> for ServiceKey {
    fn from(key: &ServiceKey) -> Self {
        key.clone()
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
