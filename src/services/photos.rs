use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::PhotoRef;
use crate::services::traits::PhotoStore;

/// Photos kept as `photo_<uuid>.jpg` files in a local directory
#[derive(Debug, Clone)]
pub struct LocalPhotoStore {
    dir: PathBuf,
}

impl LocalPhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    fn allocate(&self) -> PathBuf {
        self.dir.join(format!("photo_{}.jpg", Uuid::new_v4().simple()))
    }

    async fn release(&self, photos: &[PhotoRef]) {
        for photo in photos {
            match tokio::fs::remove_file(&photo.path).await {
                Ok(()) => debug!(path = %photo.path.display(), "Removed temporary photo"),
                Err(e) => warn!(
                    path = %photo.path.display(),
                    error = %e,
                    "Failed to remove temporary photo"
                ),
            }
        }
    }
}
