use super::Host;
use super::common::workspace_root;
use crate::Result;
use crate::manifest::Manifest;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output manifest path (default is `facadegen.toml` in workspace root)
    #[arg(value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Path to Cargo.toml file
    #[arg(long, default_value = "Cargo.toml", value_name = "PATH")]
    pub manifest_path: Utf8PathBuf,

    /// Overwrite the output file if it already exists
    #[arg(long)]
    pub force: bool,
}

pub fn init_manifest<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = match &args.output {
        Some(path) => path.clone(),
        None => workspace_root(&args.manifest_path)?.join("facadegen.toml"),
    };

    if output.exists() && !args.force {
        bail!("'{output}' already exists, use --force to overwrite it");
    }

    Manifest::save_default(&output)?;
    let _ = writeln!(host.output(), "Generated default manifest: {output}");
    Ok(())
}
