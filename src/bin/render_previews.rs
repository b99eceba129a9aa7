//! Render SVG sample previews for every family and face in the catalog.
//!
//! The annotated with-previews catalog is only written when every face
//! preview succeeded; on partial failure the previous file stays in place
//! and the failure count is reported. An interrupt aborts immediately
//! without touching the with-previews file.

use anyhow::{Context, Result};
use fontcellar::{CURRENT_RELEASE, CollectionConfig, PreviewGenerator, load_catalog_from_path};

#[async_std::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("interrupted: the with-previews catalog was not updated");
        std::process::exit(130);
    })
    .context("installing interrupt handler")?;

    let config = CollectionConfig::new(CURRENT_RELEASE);
    let catalog = load_catalog_from_path(&config.catalog_path())
        .context("run sync-catalog first to produce the catalog")?;
    let with_previews_path = config.with_previews_path();

    let report = PreviewGenerator::new(config).generate(&catalog).await?;

    println!(
        "generated {} of {} family previews and {} of {} face previews",
        report.families_succeeded,
        report.families_attempted,
        report.faces_succeeded,
        report.faces_attempted
    );
    if report.published {
        println!("wrote {}", with_previews_path.display());
    } else {
        eprintln!(
            "{} face previews failed; {} was not updated",
            report.face_failures(),
            with_previews_path.display()
        );
    }
    Ok(())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
