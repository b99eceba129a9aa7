//! Serializable representation of the font-collection catalog.
//!
//! The types mirror the published catalog schema so the sync, download, and
//! preview helpers can reason about families without ad-hoc JSON handling.
//! Field names follow the schema exactly (`$schema`, `font_families`,
//! `fontFace`, `fontWeight`, `fontStyle`); the Rust side uses snake case.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Root catalog document as stored on disk.
pub struct FontCatalog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub font_families: Vec<FontFamily>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// A named font with one or more weight/style faces.
pub struct FontFamily {
    pub name: String,
    #[serde(rename = "fontFamily")]
    pub font_family: String,
    pub slug: String,
    #[serde(rename = "fontFace")]
    pub faces: Vec<FontFace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub categories: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
/// One concrete weight/style rendering of a family, backed by one binary
/// asset.
pub struct FontFace {
    pub src: String,
    #[serde(rename = "fontWeight")]
    pub font_weight: String,
    #[serde(rename = "fontStyle")]
    pub font_style: String,
    #[serde(rename = "fontFamily")]
    pub font_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Category slug paired with its display name, derived from a sync run.
pub struct Category {
    pub name: String,
    pub slug: String,
}

impl FontFamily {
    /// Face used for the family-level preview: the 400/normal face when
    /// present, otherwise the first face in catalog order.
    pub fn representative_face(&self) -> Option<&FontFace> {
        self.faces
            .iter()
            .find(|face| face.font_weight == "400" && face.font_style == "normal")
            .or_else(|| self.faces.first())
    }
}

/// Read and parse a catalog from disk.
pub fn load_catalog_from_path(path: &Path) -> Result<FontCatalog> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading catalog from {}", path.display()))?;
    let catalog: FontCatalog = serde_json::from_str(&data)
        .with_context(|| format!("parsing catalog at {}", path.display()))?;
    Ok(catalog)
}
