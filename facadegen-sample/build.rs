//! Generates the metrics facades declared in `metrics.toml`

use std::process;

fn main() {
    if let Err(e) = facadegen_lib::Builder::new("metrics.toml").generate() {
        eprintln!("unable to generate metrics facades: {e:?}");
        process::exit(1);
    }
}
