#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compile declarative metric manifests into registry-bound metrics facades
//!
//! Metrics are declared once, in a manifest, and turned at build time into one generated
//! `Metrics` type per namespace. Every facade exposes a typed accessor per metric and is
//! cached per registry, so asking for it twice yields the same instance and the same
//! registered metrics.
//!
//! # Module Organization
//!
//! - [`decl`]: Metric declarations and bucket strategies
//! - [`compiler`]: Resolution, validation and grouping of declarations
//! - [`emit`]: Rust and JSON backends
//! - [`manifest`]: Manifest loading in TOML, YAML or JSON
//! - [`builder`]: Build-script driver
//!
//! Generated code depends on the `facadegen-runtime` crate.

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod builder;
pub mod compiler;
pub mod decl;
pub mod emit;
pub mod manifest;

mod commands;

pub use crate::builder::Builder;
pub use crate::commands::{Host, run};
pub use crate::compiler::{CompileError, CompileOptions, compile};
