//! Normalization of upstream variant and category encodings.
//!
//! The listing API encodes weight and style as a single variant token
//! (`regular`, `italic`, `500`, `700italic`); the catalog stores them as
//! separate CSS-ready fields. Helpers here are pure so the mapping rules can
//! be exercised without any network fixture.

// Upstream category slug to generic CSS fallback family. Unmapped categories
// fall back to `system-ui`.
const CATEGORY_FALLBACKS: &[(&str, &str)] = &[
    ("display", "system-ui"),
    ("sans-serif", "sans-serif"),
    ("serif", "serif"),
    ("handwriting", "cursive"),
    ("monospace", "monospace"),
];

/// CSS style for an upstream variant token.
pub fn style_from_variant(variant: &str) -> &'static str {
    if variant.contains("italic") { "italic" } else { "normal" }
}

/// CSS weight for an upstream variant token. `regular` and `italic` mean 400;
/// everything else is the token with any trailing `italic` stripped.
pub fn weight_from_variant(variant: &str) -> String {
    if variant == "regular" || variant == "italic" {
        "400".to_string()
    } else {
        variant.trim_end_matches("italic").to_string()
    }
}

/// Generic fallback family for an upstream category slug.
pub fn fallback_for_category(category: &str) -> &'static str {
    CATEGORY_FALLBACKS
        .iter()
        .find(|(slug, _)| *slug == category)
        .map(|(_, fallback)| *fallback)
        .unwrap_or("system-ui")
}

/// Derive a catalog slug from a family name: lowercase with whitespace runs
/// collapsed to single hyphens. Idempotent, so re-deriving from a slug is a
/// no-op.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            pending_hyphen = !slug.is_empty();
            continue;
        }
        if pending_hyphen {
            slug.push('-');
            pending_hyphen = false;
        }
        slug.extend(ch.to_lowercase());
    }
    slug
}

/// Display name for a category slug: hyphen-separated words, each
/// capitalized (`sans-serif` becomes `Sans Serif`).
pub fn format_category_name(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rewrite a plain-http source URL to https. The upstream listing still
/// reports some binaries over http.
pub fn https_source(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}
