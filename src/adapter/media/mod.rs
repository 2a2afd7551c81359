//! Best-effort image storage for captured listings.
//!
//! A failed download or write logs a warning and yields no image reference;
//! it never aborts ingestion of the listing. The media tree is cleared
//! together with the listing store on the daily reset.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::warn;

use crate::domain::ListingId;
use crate::error::Result;

/// Downloads listing images into `<root>/<category>/<id>.jpg`.
pub struct MediaStore {
    http: HttpClient,
    root: PathBuf,
}

impl MediaStore {
    /// Create a media store rooted at the given directory.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            root: root.into(),
        })
    }

    /// Download an image and return the stored path, or `None` on any
    /// failure.
    pub async fn fetch(&self, category: &str, id: ListingId, image_url: &str) -> Option<String> {
        match self.try_fetch(category, id, image_url).await {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(listing_id = %id, url = %image_url, error = %err, "image fetch failed");
                None
            }
        }
    }

    async fn try_fetch(&self, category: &str, id: ListingId, image_url: &str) -> Result<String> {
        let response = self.http.get(image_url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let dir = self.root.join(sanitize(category));
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{id}.jpg"));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// Remove all stored images and recreate the empty root.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be removed or recreated.
    pub fn clear(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Root directory of the media tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Replace path-hostile characters in a category name with underscores.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
