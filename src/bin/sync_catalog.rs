//! Synchronize the on-disk font catalog with the upstream listing API.
//!
//! Fatal on any upstream failure (network, bad key, malformed response) so a
//! broken run can never replace a good catalog. A content-identical listing
//! is a no-op: the catalog file is left untouched and the run still exits
//! zero.

use anyhow::Result;
use fontcellar::{CollectionConfig, SyncOutcome, Synchronizer};

#[async_std::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = CollectionConfig::from_env()?;
    let catalog_path = config.catalog_path();
    let report = Synchronizer::new(config).sync().await?;

    match report.outcome {
        SyncOutcome::Updated => {
            println!(
                "updated {} with {} font families",
                catalog_path.display(),
                report.family_count
            );
            let slugs: Vec<&str> = report
                .categories
                .iter()
                .map(|category| category.slug.as_str())
                .collect();
            println!("categories: {}", slugs.join(", "));
        }
        SyncOutcome::UpToDate => println!("{} is up to date", catalog_path.display()),
    }
    Ok(())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
