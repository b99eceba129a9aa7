//! Local asset layout and batch download of catalog font binaries.
//!
//! Binary assets are addressed by the path derived from their source URL;
//! a file already on disk is treated as an immutable cache entry and never
//! re-fetched.

use crate::catalog::FontCatalog;
use crate::config::CollectionConfig;
use crate::fetch::Fetcher;
use log::{error, info};
use std::path::PathBuf;

/// Local cache path for a face source URL: the URL with the remote asset base
/// stripped, rooted under the release's `font-assets` directory. Sources from
/// other hosts keep their URL path so they still land inside the cache.
pub fn local_asset_path(config: &CollectionConfig, src: &str) -> PathBuf {
    let rel = match src.strip_prefix(&config.asset_base_url) {
        Some(rest) => rest.to_string(),
        None => match surf::Url::parse(src) {
            Ok(url) => url.path().trim_start_matches('/').to_string(),
            Err(_) => src.rsplit('/').next().unwrap_or(src).to_string(),
        },
    };
    config.assets_root().join(rel)
}

#[derive(Debug, Default)]
/// Counters for one download batch.
pub struct DownloadReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
}

impl DownloadReport {
    pub fn failures(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// Download every face binary referenced by the catalog, sequentially.
/// Failures are logged with the face identity and counted; the batch always
/// runs to the end.
pub async fn download_catalog_assets(
    config: &CollectionConfig,
    fetcher: &Fetcher,
    catalog: &FontCatalog,
) -> DownloadReport {
    let mut report = DownloadReport::default();
    let total = catalog.font_families.len();
    for (index, family) in catalog.font_families.iter().enumerate() {
        info!("downloading {} ({}/{})", family.name, index + 1, total);
        for face in &family.faces {
            let dest = local_asset_path(config, &face.src);
            if dest.exists() {
                report.skipped += 1;
                continue;
            }
            report.attempted += 1;
            match fetcher.download(&face.src, &dest).await {
                Ok(()) => report.succeeded += 1,
                Err(err) => error!(
                    "failed to download {} {} {}: {err}",
                    family.name, face.font_weight, face.font_style
                ),
            }
        }
    }
    report
}
