//! Generate thread-safe Prometheus metrics facades from declarative manifests.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use facadegen_lib::{Host, run};
use std::io::Write;
use std::io::{stderr, stdout};

/// Host for the `facadegen` command line.
///
/// Generated facade sources, JSON models and summaries go to stdout so they can be
/// redirected into a file; manifest violations go to stderr. Pending output is flushed
/// before the process exits with the status `run` chose.
#[derive(Debug, Clone, Default)]
pub struct RealHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for RealHost {
    fn output(&mut self) -> impl Write {
        stdout().lock()
    }

    fn error(&mut self) -> impl Write {
        stderr().lock()
    }

    fn exit(&mut self, code: i32) {
        // process::exit skips destructors, so buffered generated code would be lost
        let _ = stdout().flush();
        std::process::exit(code);
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
fn main() -> Result<(), ohno::AppError> {
    run(&mut RealHost, std::env::args())
}
