mod kind;
mod normalize;
mod save;
mod types;

pub use normalize::normalize;
pub use save::{download_client, save_link, SaveOutcome};
pub use types::{MediaKind, NormalizedResponse};

use crate::api::{ApiError, DownloadApi};
use tracing::{info, warn};

pub struct MediaResolver {
    api: Box<dyn DownloadApi>,
}

impl MediaResolver {
    pub fn new(api: Box<dyn DownloadApi>) -> Self {
        info!("Media resolver initialized - using the {} API", api.name());
        Self { api }
    }

    pub async fn resolve(&self, url: &str) -> Result<NormalizedResponse, ApiError> {
        info!("Starting resolve for URL: {}", url);

        let raw = match self.api.fetch(url).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{} failed: {}", self.api.name(), e);
                return Err(e);
            }
        };

        let normalized = normalize(&raw);
        info!(
            "Resolved {} link(s) and {} detail field(s)",
            normalized.links.len(),
            normalized.metadata.len()
        );
        Ok(normalized)
    }
}
