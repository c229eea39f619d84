//! Drive code generation from a build script
//!
//! ```no_run
//! // build.rs
//! fn main() {
//!     if let Err(e) = facadegen_lib::Builder::new("metrics.toml").generate() {
//!         panic!("{e}");
//!     }
//! }
//! ```
//!
//! The generated file is then pulled in with
//! `include!(concat!(env!("OUT_DIR"), "/metrics.rs"));`.

use crate::Result;
use crate::compiler::{BucketPolicy, CompileOptions, compile};
use crate::emit::{DEFAULT_RUNTIME_CRATE, generate_rust};
use crate::manifest::Manifest;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use std::env;
use std::fs;

const LOG_TARGET: &str = "   builder";

/// Name of the generated file inside `OUT_DIR`
pub const DEFAULT_OUT_FILE_NAME: &str = "metrics.rs";

#[derive(Debug, Clone)]
pub struct Builder {
    manifest_path: Utf8PathBuf,
    out_file: Option<Utf8PathBuf>,
    runtime_crate: Option<String>,
    bucket_policy: Option<BucketPolicy>,
}

impl Builder {
    #[must_use]
    pub fn new(manifest_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            out_file: None,
            runtime_crate: None,
            bucket_policy: None,
        }
    }

    /// Write to `path` instead of `$OUT_DIR/metrics.rs`
    #[must_use]
    pub fn out_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.out_file = Some(path.into());
        self
    }

    /// Override the manifest's `runtime_crate` option
    #[must_use]
    pub fn runtime_crate(mut self, name: impl Into<String>) -> Self {
        self.runtime_crate = Some(name.into());
        self
    }

    /// Override the manifest's `bucket_policy` option
    #[must_use]
    pub const fn bucket_policy(mut self, policy: BucketPolicy) -> Self {
        self.bucket_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn manifest_path(&self) -> &Utf8Path {
        &self.manifest_path
    }

    /// Compile the manifest and write the generated Rust source
    ///
    /// Returns the path of the written file. Every violation is reported to Cargo as a
    /// warning before the error is returned, so they all show up in the build output.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded, contains invalid declarations,
    /// or the output cannot be written
    pub fn generate(&self) -> Result<Utf8PathBuf> {
        println!("cargo:rerun-if-changed={}", self.manifest_path);

        let manifest = Manifest::load_file(&self.manifest_path)?;
        let options = CompileOptions::with_bucket_policy(self.bucket_policy.unwrap_or(manifest.options.bucket_policy));

        let facades = match compile(&manifest.declarations(), &options) {
            Ok(facades) => facades,
            Err(e) => {
                for violation in e.errors() {
                    println!("cargo:warning={violation}");
                }

                return Err(app_err!("'{}' contains invalid metric declarations: {e}", self.manifest_path));
            }
        };

        let runtime_crate = self
            .runtime_crate
            .as_deref()
            .or(manifest.options.runtime_crate.as_deref())
            .unwrap_or(DEFAULT_RUNTIME_CRATE);

        let mut code = String::new();
        generate_rust(&facades, runtime_crate, &mut code)?;

        let out_file = match &self.out_file {
            Some(path) => path.clone(),
            None => default_out_file()?,
        };

        if let Some(parent) = out_file.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{parent}'"))?;
        }

        fs::write(&out_file, code).into_app_err_with(|| format!("writing generated metrics to '{out_file}'"))?;
        log::info!(target: LOG_TARGET, "Generated {} facades into '{out_file}'", facades.len());

        Ok(out_file)
    }
}

fn default_out_file() -> Result<Utf8PathBuf> {
    let out_dir = env::var("OUT_DIR").into_app_err("OUT_DIR is not set, Builder::generate must run from a build script")?;
    Ok(Utf8PathBuf::from(out_dir).join(DEFAULT_OUT_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::GENERATED_HEADER;

    fn scratch() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, base)
    }

    #[test]
    fn test_generate_writes_rust_source() {
        let (_dir, base) = scratch();
        let manifest = base.join("metrics.toml");
        fs::write(&manifest, "[[metric]]\nnamespace = \"sample\"\nident = \"Error\"\ntype = \"counter\"\n").unwrap();

        let out = Builder::new(&manifest).out_file(base.join("gen/metrics.rs")).generate().unwrap();

        assert_eq!(out, base.join("gen/metrics.rs"));
        let code = fs::read_to_string(&out).unwrap();
        assert!(code.starts_with(GENERATED_HEADER));
        assert!(code.contains(":: facadegen_runtime :: FacadeCache"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let (_dir, base) = scratch();
        let manifest = base.join("metrics.toml");
        fs::write(
            &manifest,
            "[options]\nruntime_crate = \"from_manifest\"\n\n[[metric]]\nident = \"Error\"\ntype = \"counter\"\nbuckets = [1.0]\n",
        )
        .unwrap();

        let _ = Builder::new(&manifest).out_file(base.join("strict.rs")).generate().unwrap_err();

        let out = Builder::new(&manifest)
            .out_file(base.join("lenient.rs"))
            .bucket_policy(BucketPolicy::Lenient)
            .runtime_crate("from_builder")
            .generate()
            .unwrap();

        let code = fs::read_to_string(out).unwrap();
        assert!(code.contains(":: from_builder ::"));
        assert!(!code.contains("from_manifest"));
    }

    #[test]
    fn test_invalid_declarations_fail_with_every_violation() {
        let (_dir, base) = scratch();
        let manifest = base.join("metrics.toml");
        fs::write(
            &manifest,
            "[[metric]]\nident = \"A\"\ntype = \"counter\"\nname = \"bad-name\"\n\n[[metric]]\nident = \"B\"\ntype = \"gauge\"\nlabels = [\"__x\"]\n",
        )
        .unwrap();

        let out_file = base.join("metrics.rs");
        let error = Builder::new(&manifest).out_file(&out_file).generate().unwrap_err().to_string();

        assert!(error.contains("bad-name"));
        assert!(error.contains("__x"));
        assert!(!out_file.exists());
    }
}
