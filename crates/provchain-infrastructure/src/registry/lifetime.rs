//! Service lifetime definitions.

/// How long a constructed instance is cached
///
/// - **Singleton**: one instance per root provider, shared by every child scope
/// - **Scoped**: one instance per scope, dropped when the scope is released
/// - **Transient**: a new instance on every lookup, never cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifetime {
    Singleton,
    Scoped,
    Transient,
}
