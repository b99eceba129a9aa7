//! Font-collection catalog: schema types, upstream normalization, and sync.
//!
//! `model` mirrors the published catalog JSON, `variant` holds the pure
//! mapping rules from the upstream listing encoding, and `sync` owns the
//! fetch-transform-compare-write cycle.

pub mod model;
pub mod sync;
pub mod variant;

pub use model::{Category, FontCatalog, FontFace, FontFamily, load_catalog_from_path};
pub use sync::{
    ListingFont, ListingResponse, SyncOutcome, SyncReport, Synchronizer, UpstreamError,
};
pub use variant::{
    fallback_for_category, format_category_name, https_source, slugify, style_from_variant,
    weight_from_variant,
};
