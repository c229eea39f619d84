//! Walks through the generated facades and prints the resulting exposition text.

use facadegen_runtime::prometheus::{self, Encoder, TextEncoder};
use facadegen_sample::sample::{self, storage};
use std::sync::Arc;
use std::time::Instant;

const LOG_TARGET: &str = "    sample";

fn main() -> prometheus::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let start = Instant::now();

    let metrics = sample::Metrics::create()?;
    let metrics2 = sample::Metrics::create()?;
    assert!(Arc::ptr_eq(&metrics, &metrics2), "create() must return the same facade");

    metrics.error("label1Value", "label2Value").inc();
    metrics2.error("label1Value", "label2Value").inc();
    metrics.timing("labelValue").observe(10.0);

    let timer = metrics.timing2("labelValue").start_timer();
    timer.observe_duration();

    metrics.timing3("labelValue").observe(start.elapsed().as_secs_f64() * 1000.0);
    metrics.timing4("labelValue").observe(start.elapsed().as_secs_f64());
    metrics.long_help_counter().inc();
    metrics.num_threads().set(100.0);

    let storage = storage::Metrics::create()?;
    storage.reads("eu-west", "7").inc_by(3.0);
    storage.read_latency("eu-west").observe(0.012);

    let families = prometheus::gather();
    log::info!(target: LOG_TARGET, "Gathered {} metric families", families.len());

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&families, &mut buffer)?;
    println!("{}", String::from_utf8_lossy(&buffer));
    println!("Done!");

    Ok(())
}
