//! Shared library for the font-collection release pipeline.
//!
//! The crate exposes the catalog schema types and the four pipeline stages
//! used by the helper binaries: synchronizing the catalog from the upstream
//! listing API, downloading face binaries into the release tree, rendering
//! SVG sample previews, and serving the assembled release locally. Public
//! functions here form the contract the binaries depend on; each stage takes
//! an explicit `CollectionConfig` so releases and keys can be swapped in
//! tests.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod preview;
pub mod rewrite;
pub mod server;

pub use assets::{DownloadReport, download_catalog_assets, local_asset_path};
pub use catalog::{
    Category, FontCatalog, FontFace, FontFamily, ListingFont, SyncOutcome, SyncReport,
    Synchronizer, UpstreamError, load_catalog_from_path, slugify,
};
pub use config::{API_KEY_VAR, CURRENT_RELEASE, CollectionConfig};
pub use fetch::{DownloadError, Fetcher};
pub use preview::{EXCLUDED_PREVIEW_SLUGS, PreviewError, PreviewGenerator, PreviewReport};
pub use rewrite::RewriteReader;
pub use server::resolve_release_file;
