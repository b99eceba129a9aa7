//! Local development server for a release tree.
//!
//! Serves downloaded catalogs, font binaries, and generated previews at the
//! same paths the production CDN uses, so consumers can be pointed at
//! localhost unchanged. Catalog JSON is streamed through the URL rewriter;
//! everything else is streamed as-is. Anything unresolvable answers 404 with
//! a descriptive body.

use crate::config::CollectionConfig;
use crate::rewrite::RewriteReader;
use anyhow::Result;
use async_std::io::BufReader;
use log::info;
use std::path::PathBuf;
use tide::{Body, Request, Response, StatusCode};

#[derive(Clone)]
pub struct ServerState {
    config: CollectionConfig,
}

/// Build the tide app serving `/images/fonts/*` from the releases root.
pub fn app(config: CollectionConfig) -> tide::Server<ServerState> {
    let mut app = tide::with_state(ServerState { config });
    app.at("/images/fonts/*path").get(serve_release_file);
    app
}

/// Bind the configured port and serve until interrupted.
pub async fn serve(config: CollectionConfig) -> Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    info!("serving releases at http://{addr}/images/fonts/");
    app(config).listen(addr).await?;
    Ok(())
}

async fn serve_release_file(req: Request<ServerState>) -> tide::Result {
    let suffix = req.param("path")?;
    let config = &req.state().config;

    let Some(path) = resolve_release_file(config, suffix) else {
        return Ok(not_found(suffix));
    };

    if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        let file = match async_std::fs::File::open(&path).await {
            Ok(file) => file,
            Err(_) => return Ok(not_found(suffix)),
        };
        let rewriter = RewriteReader::new(
            file,
            config.canonical_fonts_url.as_bytes().to_vec(),
            config.local_fonts_url().into_bytes(),
        );
        let mut response = Response::new(StatusCode::Ok);
        // Length changes under rewriting, so the body streams chunked.
        response.set_body(Body::from_reader(BufReader::new(rewriter), None));
        response.set_content_type(tide::http::mime::JSON);
        return Ok(response);
    }

    match Body::from_file(&path).await {
        Ok(body) => Ok(Response::builder(StatusCode::Ok).body(body).build()),
        Err(_) => Ok(not_found(suffix)),
    }
}

/// Map a request suffix onto the on-disk release tree.
///
/// The first segment names the release: `wp-*` directories are used as-is,
/// anything else gains the configured directory prefix. Canonicalization
/// keeps symlinks and `..` segments from escaping the releases root; paths
/// that resolve outside it (or do not exist) are treated as not found.
pub fn resolve_release_file(config: &CollectionConfig, suffix: &str) -> Option<PathBuf> {
    let (release, rest) = suffix.split_once('/')?;
    if release.is_empty() || rest.is_empty() {
        return None;
    }
    let dir = if release.starts_with("wp-") {
        release.to_string()
    } else {
        format!("{}{}", config.release_dir_prefix, release)
    };

    let root = config.releases_root.canonicalize().ok()?;
    let candidate = root.join(dir).join(rest);
    let canonical = candidate.canonicalize().ok()?;
    canonical.starts_with(&root).then_some(canonical)
}

fn not_found(suffix: &str) -> Response {
    Response::builder(StatusCode::NotFound)
        .body(format!("File not found: {suffix}"))
        .build()
}
