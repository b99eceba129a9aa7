//! Upstream catalog synchronization.
//!
//! One listing request, a pure transformation into the catalog schema, and a
//! hash-gated write: the on-disk catalog is only rewritten when its content
//! actually changed, so downstream consumers (asset download, previews) are
//! not invalidated by no-op syncs. Upstream failures are fatal and leave the
//! existing catalog untouched.

use crate::catalog::model::{Category, FontCatalog, FontFamily, FontFace};
use crate::catalog::variant::{
    fallback_for_category, format_category_name, https_source, slugify, style_from_variant,
    weight_from_variant,
};
use crate::config::CollectionConfig;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
/// Fatal failure talking to the font listing API. Nothing is written when one
/// of these surfaces.
pub enum UpstreamError {
    #[error("font listing request failed: {0}")]
    Request(String),
    #[error("font listing API answered with status {0}")]
    Status(u16),
    #[error("font listing response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
/// Raw listing response. `items` is required; an error document from the API
/// (bad key, quota) fails decoding instead of producing an empty catalog.
pub struct ListingResponse {
    pub items: Vec<ListingFont>,
}

#[derive(Clone, Debug, Deserialize)]
/// One font entry as the listing API reports it.
pub struct ListingFont {
    pub family: String,
    pub category: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Catalog content changed and the file was rewritten.
    Updated,
    /// Content hash matched the on-disk catalog; nothing was written.
    UpToDate,
}

#[derive(Debug)]
/// Result summary of one sync run.
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub family_count: usize,
    pub categories: Vec<Category>,
}

/// Fetches the upstream listing and maintains the on-disk catalog for one
/// release.
pub struct Synchronizer {
    config: CollectionConfig,
}

impl Synchronizer {
    pub fn new(config: CollectionConfig) -> Self {
        Self { config }
    }

    /// Fetch the listing and update the catalog file if its content changed.
    pub async fn sync(&self) -> Result<SyncReport> {
        let url = self.config.listing_url()?;
        let items = fetch_listing(&url).await?;
        self.apply_listing(&items)
    }

    /// Transform listing entries into a catalog and write it when the content
    /// hash differs from the file on disk. Split from the fetch so the write
    /// policy can be exercised against fixture listings.
    pub fn apply_listing(&self, items: &[ListingFont]) -> Result<SyncReport> {
        let families: Vec<FontFamily> = items.iter().map(family_from_listing).collect();
        let categories = categories_from_listing(items);
        let catalog = FontCatalog {
            schema: self.config.schema_url.clone(),
            font_families: families,
        };
        let new_json =
            serde_json::to_string_pretty(&catalog).context("serializing catalog document")?;

        let path = self.config.catalog_path();
        let old_json = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => "{}".to_string(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading catalog at {}", path.display()));
            }
        };
        // Re-serialize the old document so the comparison tracks content, not
        // incidental formatting.
        let old_normalized = match serde_json::from_str::<Value>(&old_json) {
            Ok(value) => serde_json::to_string_pretty(&value)
                .context("re-serializing on-disk catalog for comparison")?,
            Err(err) => {
                warn!("existing catalog at {} is not valid JSON ({err}); rewriting", path.display());
                old_json
            }
        };

        let outcome = if blake3::hash(new_json.as_bytes()) == blake3::hash(old_normalized.as_bytes())
        {
            info!("catalog at {} is up to date", path.display());
            SyncOutcome::UpToDate
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&path, &new_json)
                .with_context(|| format!("writing catalog to {}", path.display()))?;
            info!(
                "catalog updated: {} families, {} categories",
                catalog.font_families.len(),
                categories.len()
            );
            SyncOutcome::Updated
        };

        Ok(SyncReport {
            outcome,
            family_count: catalog.font_families.len(),
            categories,
        })
    }
}

/// Single GET against the listing API.
async fn fetch_listing(url: &str) -> Result<Vec<ListingFont>, UpstreamError> {
    let mut response = surf::get(url)
        .await
        .map_err(|err| UpstreamError::Request(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status(status.into()));
    }
    let listing: ListingResponse = response
        .body_json()
        .await
        .map_err(|err| UpstreamError::Decode(err.to_string()))?;
    Ok(listing.items)
}

/// Map one listing entry onto the catalog schema. Variants with no download
/// URL are dropped; the API occasionally lists a variant without a file.
pub fn family_from_listing(font: &ListingFont) -> FontFamily {
    let mut faces = Vec::with_capacity(font.variants.len());
    for variant in &font.variants {
        let Some(src) = font.files.get(variant) else {
            debug!("{}: variant {variant} has no file entry, skipping", font.family);
            continue;
        };
        faces.push(FontFace {
            src: https_source(src),
            font_weight: weight_from_variant(variant),
            font_style: style_from_variant(variant).to_string(),
            font_family: font.family.clone(),
            preview: None,
        });
    }

    FontFamily {
        name: font.family.clone(),
        font_family: format!("{}, {}", font.family, fallback_for_category(&font.category)),
        slug: slugify(&font.family),
        faces,
        preview: None,
        categories: vec![font.category.clone()],
    }
}

/// Distinct categories across the listing, in slug order, with display names.
pub fn categories_from_listing(items: &[ListingFont]) -> Vec<Category> {
    let slugs: BTreeSet<&str> = items.iter().map(|font| font.category.as_str()).collect();
    slugs
        .into_iter()
        .map(|slug| Category {
            name: format_category_name(slug),
            slug: slug.to_string(),
        })
        .collect()
}
