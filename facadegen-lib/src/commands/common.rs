use crate::Result;
use crate::compiler::CompileError;
use crate::manifest::Manifest;
use camino::{Utf8Path, Utf8PathBuf};
use cargo_metadata::MetadataCommand;
use clap::{Args, ValueEnum};
use ohno::IntoAppError;
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Write, stderr};

const LOG_TARGET: &str = "  commands";

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments accepted by every command
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

/// Where to find the metric manifest
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Path to the metric manifest (default is `facadegen.toml` in the workspace root)
    #[arg(long, short = 'm', value_name = "PATH")]
    pub manifest: Option<Utf8PathBuf>,

    /// Path to Cargo.toml file
    #[arg(long, default_value = "Cargo.toml", value_name = "PATH")]
    pub manifest_path: Utf8PathBuf,
}

impl ManifestArgs {
    /// Locate and load the manifest, returning it along with the path it came from
    pub fn load(&self) -> Result<(Utf8PathBuf, Manifest)> {
        let path = match &self.manifest {
            Some(path) => path.clone(),
            None => Manifest::find(&workspace_root(&self.manifest_path)?)?,
        };

        log::debug!(target: LOG_TARGET, "Using manifest '{path}'");
        let manifest = Manifest::load_file(&path)?;
        Ok((path, manifest))
    }
}

/// Root directory of the Cargo workspace owning `manifest_path`
pub fn workspace_root(manifest_path: &Utf8Path) -> Result<Utf8PathBuf> {
    let mut metadata_cmd = MetadataCommand::new();
    let _ = metadata_cmd.manifest_path(manifest_path).no_deps();
    let metadata = metadata_cmd.exec().into_app_err("retrieving workspace metadata")?;
    Ok(metadata.workspace_root)
}

/// Initialize logger based on log level
///
/// Only the first call in a process has any effect.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

#[must_use]
pub fn use_colors(color: ColorMode) -> bool {
    match color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stderr().is_terminal(),
    }
}

/// Print every violation of a failed compilation
pub fn report_violations(writer: &mut impl Write, error: &CompileError, use_colors: bool) {
    let n = error.errors().len();
    let header = format!("found {n} invalid metric declaration{}", if n == 1 { "" } else { "s" });

    if use_colors {
        let _ = writeln!(writer, "{}", header.red().bold());
    } else {
        let _ = writeln!(writer, "{header}");
    }

    for violation in error.errors() {
        if use_colors {
            let _ = writeln!(writer, "  {} {violation}", "✗".red());
        } else {
            let _ = writeln!(writer, "  - {violation}");
        }
    }
}
