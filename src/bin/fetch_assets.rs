//! Download every face binary referenced by the current release's catalog.
//!
//! Assets already on disk are treated as cached and skipped. Individual
//! download failures are logged and counted but never abort the batch; the
//! run only fails outright when the catalog itself is missing.

use anyhow::{Context, Result};
use fontcellar::{CURRENT_RELEASE, CollectionConfig, Fetcher, download_catalog_assets,
    load_catalog_from_path};

#[async_std::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = CollectionConfig::new(CURRENT_RELEASE);
    let catalog = load_catalog_from_path(&config.catalog_path())
        .context("run sync-catalog first to produce the catalog")?;

    let fetcher = Fetcher::new();
    let report = download_catalog_assets(&config, &fetcher, &catalog).await;

    println!(
        "downloaded {} of {} font faces ({} already cached)",
        report.succeeded, report.attempted, report.skipped
    );
    if report.failures() > 0 {
        eprintln!("{} downloads failed; check the log output above", report.failures());
    }
    Ok(())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
