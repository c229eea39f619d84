//! Command-line interface for facadegen
//!
//! # Implementation Model
//!
//! The module is organized around three commands:
//!
//! - **generate**: load a manifest, compile it and write Rust or JSON output
//! - **validate**: compile a manifest and report a summary or every violation
//! - **init**: write the default manifest
//!
//! The `run` function parses command-line arguments using clap, initializes logging from
//! the global flags and routes to the appropriate command handler. Commands write through
//! a [`Host`] so they can run in-process under test. Without an explicit `--manifest`,
//! the manifest is searched for in the root of the Cargo workspace.

mod common;
mod generate;
mod host;
mod init;
mod run;
mod validate;

pub use generate::{GenerateArgs, generate_code};
pub use host::Host;
pub use init::{InitArgs, init_manifest};
pub use run::run;
pub use validate::{ValidateArgs, validate_manifest};
