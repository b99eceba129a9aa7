//! Serve the local release tree over HTTP for manual inspection.
//!
//! Catalog JSON has its canonical preview URLs rewritten to this server as
//! it streams out, so downstream consumers can be pointed at localhost
//! without editing the files.

use anyhow::Result;
use fontcellar::{CURRENT_RELEASE, CollectionConfig, server};

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
    println!(
        "serving http://localhost:{}/images/fonts/ from {}",
        config.port,
        config.releases_root.display()
    );
    server::serve(config).await
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
