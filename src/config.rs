//! Per-run configuration for the collection pipeline.
//!
//! Every binary builds one `CollectionConfig` up front and threads it into the
//! components it runs. The compiled defaults describe the current release;
//! only the upstream API key comes from the environment, so tests can point a
//! config at a scratch directory without touching process state.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable holding the upstream font API key.
pub const API_KEY_VAR: &str = "GOOGLE_FONTS_API_KEY";

/// Release currently being assembled.
pub const CURRENT_RELEASE: &str = "17.6";

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/webfonts/v1/webfonts";
const DEFAULT_SCHEMA_URL: &str = "https://schemas.wp.org/trunk/font-collection.json";
const DEFAULT_ASSET_BASE_URL: &str = "https://fonts.gstatic.com/s/";
const DEFAULT_CANONICAL_FONTS_URL: &str = "https://s.w.org/images/fonts";
const DEFAULT_RELEASE_DIR_PREFIX: &str = "gutenberg-";
const DEFAULT_PORT: u16 = 9158;

#[derive(Clone, Debug)]
/// Explicit configuration shared by the sync, download, preview, and serve
/// entry points.
pub struct CollectionConfig {
    /// Upstream font-listing API endpoint.
    pub api_base: String,
    /// API key for the upstream listing; required by sync only.
    pub api_key: Option<String>,
    /// Capability filters sent with the listing request.
    pub capabilities: Vec<String>,
    /// Schema reference embedded in every written catalog.
    pub schema_url: String,
    /// Release identifier as it appears in public URLs (e.g. `17.6`).
    pub release: String,
    /// Prefix applied to the release id to form its on-disk directory.
    pub release_dir_prefix: String,
    /// Root directory holding one subdirectory per release.
    pub releases_root: PathBuf,
    /// Remote base URL that face sources hang off; stripped to derive local
    /// asset paths.
    pub asset_base_url: String,
    /// Canonical public base URL for published fonts and previews.
    pub canonical_fonts_url: String,
    /// Local port for the development server.
    pub port: u16,
}

impl CollectionConfig {
    /// Config for a release with compiled defaults and no API key.
    pub fn new(release: &str) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            capabilities: vec!["WOFF2".to_string(), "VF".to_string()],
            schema_url: DEFAULT_SCHEMA_URL.to_string(),
            release: release.to_string(),
            release_dir_prefix: DEFAULT_RELEASE_DIR_PREFIX.to_string(),
            releases_root: PathBuf::from("releases"),
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_string(),
            canonical_fonts_url: DEFAULT_CANONICAL_FONTS_URL.to_string(),
            port: DEFAULT_PORT,
        }
    }

    /// Config for the current release with the API key read from the
    /// environment. Fails when the key is unset so sync runs cannot silently
    /// hit the API anonymously.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_VAR)
            .with_context(|| format!("{API_KEY_VAR} must be set to the upstream font API key"))?;
        let mut config = Self::new(CURRENT_RELEASE);
        config.api_key = Some(api_key);
        Ok(config)
    }

    /// On-disk directory name for this release (`gutenberg-17.6`).
    pub fn release_dir(&self) -> String {
        format!("{}{}", self.release_dir_prefix, self.release)
    }

    /// Resolve a path relative to this release's directory. Pure; performs no
    /// I/O and never fails.
    pub fn release_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.releases_root.join(self.release_dir()).join(rel)
    }

    /// Canonical catalog file for this release.
    pub fn catalog_path(&self) -> PathBuf {
        self.release_path("collections/google-fonts.json")
    }

    /// Derived catalog annotated with preview URLs.
    pub fn with_previews_path(&self) -> PathBuf {
        self.release_path("collections/google-fonts-with-previews.json")
    }

    /// Local cache directory for downloaded font binaries.
    pub fn assets_root(&self) -> PathBuf {
        self.release_path("font-assets")
    }

    /// Directory holding generated SVG previews, one subdirectory per family.
    pub fn previews_root(&self) -> PathBuf {
        self.release_path("previews")
    }

    /// Public base URL recorded in `preview` fields.
    pub fn preview_base_url(&self) -> String {
        format!("{}/{}/previews", self.canonical_fonts_url, self.release)
    }

    /// Base URL of the local development server.
    pub fn local_fonts_url(&self) -> String {
        format!("http://localhost:{}/images/fonts", self.port)
    }

    /// Listing request URL with capability filters and the key appended.
    pub fn listing_url(&self) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .with_context(|| format!("no API key configured; set {API_KEY_VAR}"))?;
        let mut url = String::from(&self.api_base);
        let mut sep = '?';
        for capability in &self.capabilities {
            url.push(sep);
            url.push_str("capability=");
            url.push_str(capability);
            sep = '&';
        }
        url.push(sep);
        url.push_str("key=");
        url.push_str(key);
        Ok(url)
    }
}
