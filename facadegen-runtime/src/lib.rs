#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Run-time support for generated metrics facades
//!
//! Code generated by `facadegen` refers to this crate for everything it needs at run time:
//! the per-registry [`FacadeCache`], the shared [`default_registry`], the transactional
//! [`register_all`] and the `prometheus` client library itself.
//!
//! # Implementation Model
//!
//! A registry is identified by its [`SharedRegistry`] allocation: clones of one `Arc` are
//! the same registry, two separately created `Arc`s are two registries even when they wrap
//! clones of the same `prometheus::Registry`. Each generated facade type owns one static
//! cache mapping registry identity to the facade built for it, so every facade is
//! constructed and registered at most once per registry.

mod cache;
mod registration;

use prometheus::Registry;
use std::sync::{Arc, LazyLock};

pub use cache::FacadeCache;
pub use prometheus;
pub use registration::register_all;

/// Registry handle facades are bound to
pub type SharedRegistry = Arc<Registry>;

static DEFAULT_REGISTRY: LazyLock<SharedRegistry> = LazyLock::new(|| Arc::new(prometheus::default_registry().clone()));

/// The process-wide registry used by each facade's `create()`
///
/// It shares its collectors with [`prometheus::default_registry`], so metrics registered
/// through it show up in [`prometheus::gather`].
#[must_use]
pub fn default_registry() -> &'static SharedRegistry {
    &DEFAULT_REGISTRY
}
