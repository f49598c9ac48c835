//! Scope-with-overlay construction
//!
//! ```text
//! base ──create_child_scope()──▶ base scope ─────────────┐
//!                                    │ (guarded)          │
//! configure(&mut ServiceCollection) ─▶ build(options) ─▶ overlay
//!                                                         │
//!                      LinkedScope { chain[overlay, base scope] }
//! ```
//!
//! If configuring or building the overlay fails (or panics), the base scope
//! is released before the error leaves this module.

use std::sync::Arc;

use provchain_domain::error::Result;
use provchain_domain::ports::ServiceRegistry;
use provchain_domain::value_objects::BuildOptions;
use tracing::{debug, warn};

use super::linked::LinkedScope;
use super::release::ReleaseGuard;
use crate::constants::OVERLAY_NAME_SUFFIX;
use crate::registry::ServiceCollection;

/// Create a child scope of `base` with overlay registrations taking priority
///
/// `options` is either a [`BuildOptions`] or a bare `bool` for scope
/// validation; it is handed to the overlay's build step untouched.
///
/// # Example
///
/// ```
/// use provchain_domain::ports::{Resolver, ServiceRegistry};
/// use provchain_infrastructure::chain::create_scope_with_overlay;
/// use provchain_infrastructure::registry::ServiceCollection;
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::named("app");
/// services.add_instance(Arc::new(String::from("production")));
/// let app = services.build(false).unwrap();
///
/// let scope = create_scope_with_overlay(
///     app.as_ref(),
///     |overlay| {
///         overlay.add_instance(Arc::new(String::from("test")));
///         Ok(())
///     },
///     false,
/// )
/// .unwrap();
///
/// assert_eq!(*scope.provider().get_required::<String>().unwrap(), "test");
/// assert_eq!(*app.get_required::<String>().unwrap(), "production");
/// scope.release().unwrap();
/// ```
pub fn create_scope_with_overlay<R, F>(
    base: &R,
    configure: F,
    options: impl Into<BuildOptions>,
) -> Result<LinkedScope>
where
    R: ServiceRegistry + ?Sized,
    F: FnOnce(&mut ServiceCollection) -> Result<()>,
{
    let options = options.into();
    let base_scope = base.create_child_scope()?;

    let mut guard = ReleaseGuard::new();
    guard.hold(Arc::clone(&base_scope));

    let overlay = build_overlay(base.name(), configure, options).inspect_err(|error| {
        warn!(base = base.name(), error = %error, "Overlay construction failed, releasing base scope");
    })?;

    guard.defuse();
    debug!(base = base.name(), overlay = overlay.name(), "Created scope with overlay");
    Ok(LinkedScope::new(overlay, base_scope))
}

fn build_overlay<F>(
    base_name: &str,
    configure: F,
    options: BuildOptions,
) -> Result<Arc<dyn ServiceRegistry>>
where
    F: FnOnce(&mut ServiceCollection) -> Result<()>,
{
    let mut overlay = ServiceCollection::named(format!("{base_name}/{OVERLAY_NAME_SUFFIX}"));
    configure(&mut overlay)?;
    let provider = overlay.build(options)?;
    Ok(provider)
}

/// Overlay scopes from any registry
pub trait OverlayScopeExt: ServiceRegistry {
    /// See [`create_scope_with_overlay`]
    fn create_scope_with_overlay<F>(
        &self,
        configure: F,
        options: impl Into<BuildOptions>,
    ) -> Result<LinkedScope>
    where
        F: FnOnce(&mut ServiceCollection) -> Result<()>,
    {
        create_scope_with_overlay(self, configure, options)
    }

    /// Overlay scope built with default options
    fn create_scope<F>(&self, configure: F) -> Result<LinkedScope>
    where
        F: FnOnce(&mut ServiceCollection) -> Result<()>,
    {
        create_scope_with_overlay(self, configure, BuildOptions::default())
    }
}

impl<R: ServiceRegistry + ?Sized> OverlayScopeExt for R {}
