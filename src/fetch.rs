//! Atomic asset downloads.
//!
//! `Fetcher::download` streams a remote resource into a temporary sibling of
//! the destination and renames it into place only after the full body
//! arrived, so a failed transfer can never leave a truncated file under the
//! final name. The temp file is owned by a guard and removed on every other
//! exit path. No retries here; callers decide whether a batch continues, and
//! the existence check that skips a download is the caller's cache policy.

use std::fs;
use std::path::Path;

use futures::io::AsyncWriteExt;
use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Error)]
/// Per-asset download failure. Recovered by batch callers, which log and
/// count it rather than aborting.
pub enum DownloadError {
    #[error("request for {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("{url} redirected without a usable Location header")]
    BadRedirect { url: String },
    #[error("too many redirects fetching {url}")]
    TooManyRedirects { url: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HTTP client wrapper for pulling font binaries into the release tree.
pub struct Fetcher {
    client: surf::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            client: surf::Client::new(),
        }
    }

    /// Download `url` to `dest`, creating missing parent directories. Writes
    /// go to a temporary file that is renamed to `dest` on success and
    /// dropped (removed, best effort) on failure.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let parent = dest.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;
        let temp = NamedTempFile::new_in(parent)?;

        let mut response = self.get_following_redirects(url).await?;
        let mut file: async_std::fs::File = temp.reopen()?.into();
        futures::io::copy(&mut response, &mut file).await?;
        file.flush().await?;
        drop(file);

        temp.persist(dest).map_err(|err| err.error)?;
        debug!("downloaded {url} to {}", dest.display());
        Ok(())
    }

    async fn get_following_redirects(&self, url: &str) -> Result<surf::Response, DownloadError> {
        let mut current = url.to_string();
        for _ in 0..MAX_REDIRECTS {
            let response =
                self.client
                    .get(&current)
                    .await
                    .map_err(|err| DownloadError::Request {
                        url: current.clone(),
                        reason: err.to_string(),
                    })?;
            let status = response.status();
            if status.is_redirection() {
                let location = response
                    .header("location")
                    .map(|values| values.last().as_str().to_string());
                let Some(location) = location else {
                    return Err(DownloadError::BadRedirect { url: current });
                };
                current = absolutize(&current, &location)?;
                continue;
            }
            if !status.is_success() {
                return Err(DownloadError::Status {
                    url: current,
                    status: status.into(),
                });
            }
            return Ok(response);
        }
        Err(DownloadError::TooManyRedirects {
            url: url.to_string(),
        })
    }
}

/// Resolve a Location header against the request URL; redirect targets may be
/// relative.
fn absolutize(base: &str, location: &str) -> Result<String, DownloadError> {
    if let Ok(url) = surf::Url::parse(location) {
        return Ok(url.into());
    }
    let base_url = surf::Url::parse(base).map_err(|_| DownloadError::BadRedirect {
        url: base.to_string(),
    })?;
    base_url
        .join(location)
        .map(String::from)
        .map_err(|_| DownloadError::BadRedirect {
            url: base.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn relative_redirects_resolve_against_request_url() {
        let resolved = absolutize("https://fonts.example/s/archivo/v1.ttf", "/mirror/v1.ttf")
            .expect("resolved");
        assert_eq!(resolved, "https://fonts.example/mirror/v1.ttf");

        let absolute = absolutize("https://fonts.example/s/a.ttf", "https://cdn.example/a.ttf")
            .expect("resolved");
        assert_eq!(absolute, "https://cdn.example/a.ttf");
    }

    #[async_std::test]
    async fn failed_transfer_leaves_no_files_behind() {
        let dir = TempDir::new().expect("tempdir");
        let dest = dir.path().join("font-assets/archivo/archivo.ttf");

        // Grab a port that nothing is listening on.
        let port = {
            let probe = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            probe.local_addr().expect("addr").port()
        };
        let url = format!("http://127.0.0.1:{port}/archivo.ttf");

        let fetcher = Fetcher::new();
        let err = fetcher
            .download(&url, &dest)
            .await
            .expect_err("download must fail");
        assert!(matches!(err, DownloadError::Request { .. }), "got {err:?}");

        assert!(!dest.exists());
        let leftovers: Vec<_> = fs::read_dir(dest.parent().expect("parent"))
            .expect("read parent")
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }
}
