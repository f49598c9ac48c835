//! Reference registry
//!
//! A small type-keyed registry satisfying the full
//! [`provchain_domain::ports::ServiceRegistry`] contract, including every
//! optional capability. Resolution chains and overlay scopes are built on
//! top of it, but they only ever talk to it through the contract.
//!
//! ```text
//! ServiceCollection ──build(options)──▶ ServiceProvider (root)
//!                                            │ singletons
//!                                            ├── create_child_scope() ─▶ scope-1 (scoped cache)
//!                                            └── create_child_scope() ─▶ scope-2 (scoped cache)
//! ```

pub mod collection;
pub mod descriptor;
pub(crate) mod lifetime;
pub mod provider;

pub use collection::ServiceCollection;
pub use descriptor::ReleaseEvent;
pub use provider::ServiceProvider;
