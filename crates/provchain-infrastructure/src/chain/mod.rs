//! Resolution chaining and linked lifetimes
//!
//! - [`ResolutionChain`] routes lookups across an ordered list of registries
//! - [`LinkedScope`] ties an overlay registry and a base scope together
//! - [`create_scope_with_overlay`] builds the two and links them

pub mod linked;
pub mod overlay;
mod release;
pub mod resolution;

pub use linked::LinkedScope;
pub use overlay::{create_scope_with_overlay, OverlayScopeExt};
pub use resolution::{ChainOwnership, ResolutionChain};
