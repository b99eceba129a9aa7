//! Sequential preview batch over a catalog.
//!
//! Families and faces are processed strictly one at a time. Each item runs
//! under its own error boundary: a fetch, decode, or rasterize failure is
//! logged with the offending identity and counted, and the batch moves on.
//! The annotated catalog is only published when every attempted face
//! succeeded, so a partially-annotated document never replaces a good one.

use crate::assets::local_asset_path;
use crate::catalog::{FontCatalog, FontFace, FontFamily};
use crate::config::CollectionConfig;
use crate::fetch::Fetcher;
use crate::preview::{PreviewError, svg, woff};
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// Families whose slugs are known to produce useless sample previews: color
// emoji and icon faces, plus test-card fonts whose glyphs are bars or boxes.
pub const EXCLUDED_PREVIEW_SLUGS: &[&str] = &[
    "flow-block",
    "flow-circular",
    "flow-rounded",
    "material-icons",
    "material-icons-outlined",
    "material-icons-round",
    "material-icons-sharp",
    "material-icons-two-tone",
    "material-symbols-outlined",
    "material-symbols-rounded",
    "material-symbols-sharp",
    "noto-color-emoji",
    "noto-emoji",
    "noto-music",
    "noto-sans-symbols",
    "noto-sans-symbols-2",
    "redacted",
    "redacted-script",
];

#[derive(Debug, Default)]
/// Counters for one preview batch.
pub struct PreviewReport {
    pub families_attempted: usize,
    pub families_succeeded: usize,
    pub faces_attempted: usize,
    pub faces_succeeded: usize,
    /// Whether the with-previews catalog was written.
    pub published: bool,
}

impl PreviewReport {
    pub fn face_failures(&self) -> usize {
        self.faces_attempted - self.faces_succeeded
    }
}

/// Renders previews for every family and face in a catalog and publishes the
/// annotated copy.
pub struct PreviewGenerator {
    config: CollectionConfig,
    fetcher: Fetcher,
}

impl PreviewGenerator {
    pub fn new(config: CollectionConfig) -> Self {
        Self {
            config,
            fetcher: Fetcher::new(),
        }
    }

    /// Run the batch and, when every face succeeded, write the annotated
    /// catalog to the with-previews file. Returns the counters either way.
    pub async fn generate(&self, catalog: &FontCatalog) -> Result<PreviewReport> {
        let mut updated = catalog.clone();
        let mut report = PreviewReport::default();
        let total = updated.font_families.len();

        for (index, family) in updated.font_families.iter_mut().enumerate() {
            if EXCLUDED_PREVIEW_SLUGS.contains(&family.slug.as_str()) {
                info!("skipping {} ({}/{}): excluded from previews", family.name, index + 1, total);
                continue;
            }
            info!("generating previews for {} ({}/{})", family.name, index + 1, total);

            report.families_attempted += 1;
            match self.family_preview(family).await {
                Ok(url) => {
                    family.preview = Some(url);
                    report.families_succeeded += 1;
                }
                Err(err) => error!("family preview for {} failed: {err}", family.name),
            }

            for face_index in 0..family.faces.len() {
                report.faces_attempted += 1;
                let face = family.faces[face_index].clone();
                match self.face_preview(&family.name, &family.slug, &face).await {
                    Ok(url) => {
                        family.faces[face_index].preview = Some(url);
                        report.faces_succeeded += 1;
                    }
                    Err(err) => error!(
                        "preview for {} {} {} failed: {err}",
                        family.name, face.font_weight, face.font_style
                    ),
                }
            }
        }

        let path = self.config.with_previews_path();
        if report.face_failures() == 0 {
            let json = serde_json::to_string_pretty(&updated)
                .context("serializing annotated catalog")?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&path, json)
                .with_context(|| format!("writing annotated catalog to {}", path.display()))?;
            info!(
                "published {} with {} face previews",
                path.display(),
                report.faces_succeeded
            );
            report.published = true;
        } else {
            warn!(
                "{} of {} face previews failed; {} left untouched",
                report.face_failures(),
                report.faces_attempted,
                path.display()
            );
        }
        Ok(report)
    }

    async fn family_preview(&self, family: &FontFamily) -> Result<String, PreviewError> {
        let face = family.representative_face().ok_or_else(|| {
            PreviewError::Rasterize(format!("{} lists no faces", family.name))
        })?;
        self.render_to_file(&family.name, &family.slug, face, None).await
    }

    async fn face_preview(
        &self,
        family_name: &str,
        slug: &str,
        face: &FontFace,
    ) -> Result<String, PreviewError> {
        self.render_to_file(family_name, slug, face, Some(face)).await
    }

    /// Render one preview SVG and return its public URL. `labeled_face` is
    /// set for face previews, whose sample text and filename carry the
    /// weight and style.
    async fn render_to_file(
        &self,
        family_name: &str,
        slug: &str,
        face: &FontFace,
        labeled_face: Option<&FontFace>,
    ) -> Result<String, PreviewError> {
        let (text, filename) = match labeled_face {
            Some(face) => (
                format!("{family_name} {} {}", face.font_weight, face.font_style),
                format!("{slug}-{}-{}.svg", face.font_weight, face.font_style),
            ),
            None => (family_name.to_string(), format!("{slug}.svg")),
        };
        let url = format!("{}/{slug}/{filename}", self.config.preview_base_url());

        let svg_path = self.config.previews_root().join(slug).join(&filename);
        if svg_path.exists() {
            return Ok(url);
        }

        let asset = self.ensure_asset(face).await?;
        let markup = self.render_asset(&asset, &text)?;

        if let Some(parent) = svg_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&svg_path, markup)?;
        Ok(url)
    }

    /// Make sure the face binary is cached locally, downloading it if absent.
    async fn ensure_asset(&self, face: &FontFace) -> Result<PathBuf, PreviewError> {
        let local = local_asset_path(&self.config, &face.src);
        if !local.exists() {
            self.fetcher.download(&face.src, &local).await?;
        }
        Ok(local)
    }

    /// Rasterize sample text from a cached asset. Compressed containers are
    /// unwrapped into a temporary sfnt next to the asset; the intermediate is
    /// removed as soon as rendering finishes and is never cached.
    fn render_asset(&self, asset: &Path, text: &str) -> Result<String, PreviewError> {
        let raw = fs::read(asset)?;
        if woff::is_woff2(&raw) {
            return Err(PreviewError::Decode(
                "WOFF2 containers are not supported here".to_string(),
            ));
        }
        if woff::is_woff(&raw) {
            let sfnt = woff::decode_woff(&raw)?;
            let parent = asset.parent().unwrap_or(Path::new("."));
            let mut intermediate = NamedTempFile::new_in(parent)?;
            intermediate.write_all(&sfnt)?;
            return svg::render_sample(intermediate.path(), text);
        }
        svg::render_sample(asset, text)
    }
}
