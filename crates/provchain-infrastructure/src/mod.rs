//! # provchain infrastructure layer
//!
//! Concrete pieces behind the domain ports:
//!
//! - [`registry`] - `ServiceCollection` / `ServiceProvider`, a type-keyed registry
//!   with singleton, scoped and transient lifetimes
//! - [`chain`] - `ResolutionChain`, `LinkedScope` and overlay-scope construction
//! - [`config`] - figment-based configuration loading
//! - [`logging`] - tracing subscriber setup
//!
//! ## Example
//!
//! ```
//! use provchain_domain::ports::{Resolver, ServiceRegistry};
//! use provchain_infrastructure::chain::{OverlayScopeExt, ResolutionChain};
//! use provchain_infrastructure::registry::ServiceCollection;
//! use std::sync::Arc;
//!
//! let mut defaults = ServiceCollection::named("defaults");
//! defaults.add_instance(Arc::new(8080_u16));
//! let mut app = ServiceCollection::named("app");
//! app.add_instance(Arc::new(String::from("app")));
//!
//! let app: Arc<dyn ServiceRegistry> = app.build(false).unwrap();
//! let defaults: Arc<dyn ServiceRegistry> = defaults.build(false).unwrap();
//! let chain = ResolutionChain::new(vec![app, defaults]);
//! assert_eq!(*chain.get_required::<u16>().unwrap(), 8080);
//!
//! let scope = chain
//!     .create_scope(|overlay| {
//!         overlay.add_instance(Arc::new(9090_u16));
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(*scope.provider().get_required::<u16>().unwrap(), 9090);
//! scope.release().unwrap();
//! ```

pub mod chain;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod registry;

pub use chain::{create_scope_with_overlay, LinkedScope, OverlayScopeExt, ResolutionChain};
pub use registry::{ServiceCollection, ServiceProvider};
