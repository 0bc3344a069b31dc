use std::{
    fs::File,
    io::{BufReader, BufWriter},
    str::FromStr,
    sync::Arc,
    time::Instant,
};

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use reservoir::{
    db::{models::BUNDLE_ID, EntityStore},
    replay, MemoryStore, Processor, Settings,
};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings =
        Settings::new().context("Failed to load config.yaml. Please ensure it is valid")?;

    let level = LevelFilter::from_str(&settings.logging.level)
        .with_context(|| format!("Invalid log level '{}'", settings.logging.level))?;
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("Failed to initialize logger")?;

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("Usage: reservoir <logs.jsonl> [snapshot.json]")?;
    let snapshot_path = args.next();
    let file = File::open(&path).with_context(|| format!("Failed to open {}", path))?;

    let mut processor = Processor::new(MemoryStore::new(), Arc::new(settings.pricing));

    info!("Replaying {}", path);
    let started = Instant::now();
    let summary = replay(BufReader::new(file), &mut processor)
        .with_context(|| format!("Replay of {} failed", path))?;

    info!(
        "Replayed {} lines in {:?}: {} logs applied, {} skipped, {} pairs indexed",
        summary.lines_read,
        started.elapsed(),
        summary.logs_applied,
        summary.logs_skipped,
        processor.registry().len()
    );

    let store = processor.store();
    match store.load_bundle(BUNDLE_ID)? {
        Some(bundle) => info!("Native asset price: ${}", bundle.eth_price),
        None => warn!("No pairs created, native asset price unknown"),
    }

    if let Some(factory) = store.load_factory()? {
        info!(
            "Factory: {} pairs, {} txs, liquidity ${} ({} ETH), volume ${} tracked / ${} untracked",
            factory.pair_count,
            factory.tx_count,
            factory.total_liquidity_usd.round(2),
            factory.total_liquidity_eth.round(4),
            factory.total_volume_usd.round(2),
            factory.untracked_volume_usd.round(2)
        );
    }

    if let Some(snapshot_path) = snapshot_path {
        let file = File::create(&snapshot_path)
            .with_context(|| format!("Failed to create {}", snapshot_path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &store.snapshot())
            .with_context(|| format!("Failed to write snapshot to {}", snapshot_path))?;
        info!("Wrote store snapshot to {}", snapshot_path);
    }

    Ok(())
}
