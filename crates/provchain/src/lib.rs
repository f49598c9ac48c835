//! # provchain
//!
//! Composable service resolution: chain independent registries into one
//! priority-ordered lookup, aggregate collection requests across the chain,
//! and open overlay scopes whose overlay and base lifetimes are released
//! together.
//!
//! ## Quick Start
//!
//! ```
//! use provchain::prelude::*;
//! use std::sync::Arc;
//!
//! trait Stage: Send + Sync {
//!     fn label(&self) -> &'static str;
//! }
//! struct Parse;
//! struct Audit;
//! impl Stage for Parse { fn label(&self) -> &'static str { "parse" } }
//! impl Stage for Audit { fn label(&self) -> &'static str { "audit" } }
//!
//! let mut services = ServiceCollection::named("app");
//! services.add_instance::<dyn Stage>(Arc::new(Parse));
//! let app = services.build(BuildOptions::default()).unwrap();
//!
//! let scope = app
//!     .create_scope(|overlay| {
//!         overlay.add_instance::<dyn Stage>(Arc::new(Audit));
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! // Overlay stages come first.
//! let stages: Vec<_> = scope
//!     .provider()
//!     .get_all::<dyn Stage>()
//!     .unwrap()
//!     .iter()
//!     .map(|stage| stage.label())
//!     .collect();
//! assert_eq!(stages, ["audit", "parse"]);
//!
//! scope.release().unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - [`domain`] - registry contract, request types, errors
//! - [`infrastructure`] - reference registry, resolution chain, linked scopes,
//!   configuration and logging

/// Domain layer (registry contract, value objects, errors)
pub use provchain_domain as domain;

/// Infrastructure layer (registries, chains, configuration, logging)
pub use provchain_infrastructure as infrastructure;

pub use provchain_domain::{
    BuildOptions, Error, Resolver, Result, ServiceKey, ServiceRegistry, ServiceRequest,
    ServiceType,
};
pub use provchain_infrastructure::{
    create_scope_with_overlay, LinkedScope, OverlayScopeExt, ResolutionChain, ServiceCollection,
    ServiceProvider,
};

/// Everything needed to register, chain and resolve
pub mod prelude {
    pub use provchain_domain::ports::{
        AsyncRelease, KeyedLookup, Reachability, Resolver, ServiceRegistry,
    };
    pub use provchain_domain::{BuildOptions, Error, Result, ServiceKey};
    pub use provchain_infrastructure::chain::{
        create_scope_with_overlay, LinkedScope, OverlayScopeExt, ResolutionChain,
    };
    pub use provchain_infrastructure::registry::{ServiceCollection, ServiceProvider};
}
