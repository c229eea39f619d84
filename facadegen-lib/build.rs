//! This build script checks that the default manifest (`default_manifest.toml`) compiles cleanly

#![allow(
    clippy::redundant_pub_crate,
    reason = "pub(crate) is correct in library context but appears redundant in build script"
)]
#![allow(dead_code, reason = "Some items may be unused in this build script context")]
#![allow(unused_imports, reason = "Some items may be unused in this build script context")]

use camino::Utf8PathBuf;
use ohno::IntoAppError;
use std::env;
use std::process;

type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[path = "src/decl/mod.rs"]
mod decl;

#[path = "src/compiler/mod.rs"]
mod compiler;

#[path = "src/manifest/mod.rs"]
mod manifest;

fn main() {
    println!("cargo:rerun-if-changed=default_manifest.toml");
    println!("cargo:rerun-if-changed=src/decl");
    println!("cargo:rerun-if-changed=src/compiler");
    println!("cargo:rerun-if-changed=src/manifest");

    match inner_main() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            for violation in e.errors() {
                println!("cargo:warning=default manifest: {violation}");
            }

            process::exit(1);
        }
        Err(e) => {
            eprintln!("unable to load default_manifest.toml: {e:?}");
            process::exit(1);
        }
    }
}

fn inner_main() -> Result<Result<(), compiler::CompileError>> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").into_app_err("CARGO_MANIFEST_DIR should be set during build")?;
    let path = Utf8PathBuf::from(manifest_dir).join("default_manifest.toml");

    let manifest = manifest::Manifest::load_file(&path)?;
    Ok(compiler::compile(&manifest.declarations(), &manifest.compile_options()).map(|_| ()))
}
