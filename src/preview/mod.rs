//! SVG preview generation for catalog families and faces.
//!
//! `svg` renders sample text from glyph outlines, `woff` unwraps compressed
//! containers first, and `generate` runs the sequential batch that annotates
//! the catalog with preview URLs.

pub mod generate;
pub mod svg;
pub mod woff;

use crate::fetch::DownloadError;
use thiserror::Error;

pub use generate::{EXCLUDED_PREVIEW_SLUGS, PreviewGenerator, PreviewReport};

#[derive(Debug, Error)]
/// Per-item preview failure. The batch logs and counts these; they never
/// abort the run.
pub enum PreviewError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error("decoding font container: {0}")]
    Decode(String),
    #[error("rasterizing sample text: {0}")]
    Rasterize(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
