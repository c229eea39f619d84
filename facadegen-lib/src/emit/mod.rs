//! Backends that turn facade definitions into output artifacts
//!
//! # Implementation Model
//!
//! Two backends are provided, each accessed through a `generate` function that writes to a
//! [`core::fmt::Write`]:
//!
//! - **Rust**: source code built with `quote`, meant to be `include!`d from a build
//!   script's output directory. One module per namespace, each holding a `Metrics` struct,
//!   a per-registry instance cache and one accessor per metric.
//! - **JSON**: a description of every facade with fully expanded bucket bounds, for
//!   tooling and review.
//!
//! Both backends consume the output of [`crate::compiler::compile`] and perform no
//! validation of their own beyond the runtime crate name.

mod idents;
mod json;
mod rust;

pub use json::generate as generate_json;
pub use rust::generate as generate_rust;
pub use rust::{DEFAULT_RUNTIME_CRATE, GENERATED_HEADER};

use strum::{Display, EnumString};

/// Output format of the code generator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Rust,
    Json,
}
