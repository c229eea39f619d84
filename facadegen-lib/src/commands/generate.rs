use super::Host;
use super::common::{ColorMode, ManifestArgs, report_violations, use_colors};
use crate::Result;
use crate::compiler::{BucketPolicy, CompileOptions, compile};
use crate::emit::{DEFAULT_RUNTIME_CRATE, OutputFormat, generate_json, generate_rust};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::{IntoAppError, app_err};
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: ManifestArgs,

    /// Output format [possible values: rust, json]
    #[arg(long, value_name = "FORMAT", default_value_t = OutputFormat::Rust)]
    pub format: OutputFormat,

    /// Write to this file instead of standard output
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Crate generated code refers to (overrides the manifest)
    #[arg(long, value_name = "NAME")]
    pub runtime_crate: Option<String>,

    /// How to treat conflicting bucket annotations (overrides the manifest) [possible values: strict, lenient]
    #[arg(long, value_name = "POLICY")]
    pub bucket_policy: Option<BucketPolicy>,
}

pub fn generate_code<H: Host>(host: &mut H, args: &GenerateArgs, color: ColorMode) -> Result<()> {
    let (path, manifest) = args.source.load()?;
    let options = CompileOptions::with_bucket_policy(args.bucket_policy.unwrap_or(manifest.options.bucket_policy));

    let facades = match compile(&manifest.declarations(), &options) {
        Ok(facades) => facades,
        Err(e) => {
            report_violations(&mut host.error(), &e, use_colors(color));
            host.exit(1);
            return Err(app_err!("'{path}' contains invalid metric declarations"));
        }
    };

    let mut text = String::new();
    match args.format {
        OutputFormat::Rust => {
            let runtime_crate = args
                .runtime_crate
                .as_deref()
                .or(manifest.options.runtime_crate.as_deref())
                .unwrap_or(DEFAULT_RUNTIME_CRATE);
            generate_rust(&facades, runtime_crate, &mut text)?;
        }
        OutputFormat::Json => generate_json(&facades, &mut text)?,
    }

    if let Some(output) = &args.output {
        fs::write(output, &text).into_app_err_with(|| format!("writing generated code to '{output}'"))?;
        let _ = writeln!(host.output(), "Generated {} facades into {output}", facades.len());
    } else {
        let _ = write!(host.output(), "{text}");
    }

    Ok(())
}
