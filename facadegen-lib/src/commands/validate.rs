use super::Host;
use super::common::{ColorMode, ManifestArgs, report_violations, use_colors};
use crate::Result;
use crate::compiler::{BucketPolicy, CompileOptions, compile};
use clap::Parser;
use ohno::app_err;
use owo_colors::OwoColorize;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: ManifestArgs,

    /// How to treat conflicting bucket annotations (overrides the manifest) [possible values: strict, lenient]
    #[arg(long, value_name = "POLICY")]
    pub bucket_policy: Option<BucketPolicy>,
}

/// Compile a manifest without generating anything, reporting every violation
pub fn validate_manifest<H: Host>(host: &mut H, args: &ValidateArgs, color: ColorMode) -> Result<()> {
    let (path, manifest) = match args.source.load() {
        Ok(loaded) => loaded,
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Manifest validation failed: {e}");
            host.exit(1);
            return Err(e);
        }
    };

    let options = CompileOptions::with_bucket_policy(args.bucket_policy.unwrap_or(manifest.options.bucket_policy));
    let colored = use_colors(color);

    match compile(&manifest.declarations(), &options) {
        Ok(facades) => {
            let metrics: usize = facades.iter().map(|f| f.metrics.len()).sum();
            let summary = format!("{path}: {metrics} metrics in {} namespaces", facades.len());
            if colored {
                let _ = writeln!(host.output(), "{} {summary}", "✔".green().bold());
            } else {
                let _ = writeln!(host.output(), "{summary}");
            }

            Ok(())
        }
        Err(e) => {
            report_violations(&mut host.error(), &e, colored);
            host.exit(1);
            Err(app_err!("'{path}' contains {} invalid metric declarations", e.errors().len()))
        }
    }
}
