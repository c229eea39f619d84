//! Command dispatch logic for facadegen

use super::common::{CommonArgs, init_logging};
use super::{GenerateArgs, InitArgs, ValidateArgs, generate_code, init_manifest, validate_manifest};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "facadegen", author, version, long_about = None)]
#[command(about = "Generate typed metrics facades from declarative manifests")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: FacadegenSubcommand,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum FacadegenSubcommand {
    /// Compile a manifest and emit the generated code
    Generate(Box<GenerateArgs>),
    /// Check a manifest for invalid declarations
    Validate(ValidateArgs),
    /// Generate a default manifest file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.common.log_level);

    match &cli.command {
        FacadegenSubcommand::Generate(generate_args) => generate_code(host, generate_args, cli.common.color),
        FacadegenSubcommand::Validate(validate_args) => validate_manifest(host, validate_args, cli.common.color),
        FacadegenSubcommand::Init(init_args) => init_manifest(host, init_args),
    }
}
