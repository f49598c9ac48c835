//! # provchain domain layer
//!
//! Types and ports shared by every registry implementation:
//!
//! - [`ports::ServiceRegistry`] - the contract a backing registry satisfies
//! - [`ports::KeyedLookup`], [`ports::Reachability`], [`ports::AsyncRelease`] -
//!   optional capabilities, probed rather than required
//! - [`ports::Resolver`] - typed accessors (`get`, `get_required`, `get_all`, ...)
//! - [`value_objects`] - service identity, tagged requests and build options
//! - [`error`] - the error taxonomy shared across the workspace

pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{Resolver, ServiceRegistry};
pub use value_objects::{BuildOptions, Service, ServiceKey, ServiceRequest, ServiceType};
