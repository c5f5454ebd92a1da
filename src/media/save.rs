use super::kind::{extension_from_url, last_path_segment};
use super::types::LinkDescriptor;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

const DEFAULT_FILENAME: &str = "download.mp4";
const MAX_NAME_ATTEMPTS: usize = 100;

#[derive(Debug, PartialEq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// Fetching or writing failed; the link should be opened directly instead.
    Fallback(String),
}

/// File name for a saved link: the URL's own file name when it has an
/// extension, else `download.<ext>`, else `download.mp4`.
pub fn suggested_filename(link: &LinkDescriptor) -> String {
    let segment = last_path_segment(&link.url);
    if extension_from_url(&link.url).is_some() && is_safe_filename(&segment) {
        return segment;
    }

    match &link.extension {
        Some(ext) if is_safe_filename(ext) => format!("download.{}", ext),
        _ => DEFAULT_FILENAME.to_string(),
    }
}

fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\', '\0'])
}

/// `clip.mp4`, then `clip (1).mp4`, `clip (2).mp4`, ...
fn numbered_filename(filename: &str, n: usize) -> String {
    if n == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{} ({}).{}", stem, n, ext),
        None => format!("{} ({})", filename, n),
    }
}

/// Downloads `link` into `dir` in one attempt. Any failure degrades to
/// [`SaveOutcome::Fallback`] rather than an error.
pub async fn save_link(
    client: &reqwest::Client,
    link: &LinkDescriptor,
    dir: &Path,
) -> SaveOutcome {
    let filename = suggested_filename(link);

    match fetch_to_file(client, &link.url, dir, &filename).await {
        Ok(path) => {
            info!("Saved {} to {}", link.url, path.display());
            SaveOutcome::Saved(path)
        }
        Err(e) => {
            warn!("Download failed: {:#}", e);
            warn!("Open the link directly instead: {}", link.url);
            SaveOutcome::Fallback(link.url.clone())
        }
    }
}

async fn fetch_to_file(
    client: &reqwest::Client,
    url: &str,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf> {
    debug!("Fetching {} into {}", url, dir.display());

    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to fetch media URL")?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!(
            "Failed to download media: HTTP {}",
            response.status()
        ));
    }

    let data = response
        .bytes()
        .await
        .context("Failed to read media data")?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    file.write_all(&data).context("Failed to write media data")?;

    persist_without_overwrite(file, dir, filename)
}

/// Moves the finished temp file to the first free `filename` variant in `dir`.
/// Existing files are never replaced.
fn persist_without_overwrite(
    mut file: NamedTempFile,
    dir: &Path,
    filename: &str,
) -> Result<PathBuf> {
    for n in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(numbered_filename(filename, n));
        match file.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!("{} already exists, trying the next name", path.display());
                file = e.file;
            }
            Err(e) => {
                return Err(e.error)
                    .with_context(|| format!("Failed to move download to {}", path.display()));
            }
        }
    }

    Err(anyhow::anyhow!(
        "No free file name for {} in {}",
        filename,
        dir.display()
    ))
}

pub fn download_client(timeout_secs: u64, user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent)
        .build()
        .context("Failed to create HTTP client")
}
