//! Domain ports
//!
//! Interfaces a backing registry implements and the typed accessors
//! callers use on top of them.

pub mod registry;
pub mod resolver;

pub use registry::{
    release_registry, AsyncRelease, KeyedLookup, Reachability, ServiceRegistry,
};
pub use resolver::Resolver;
