use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{StoreError, TransportError};
use crate::models::PhotoRef;
use crate::services::types::{ChatId, OutgoingText};

/// Outbound side of the messaging platform
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, message: &OutgoingText) -> Result<(), TransportError>;

    /// Sends the photos as one album, `caption` (HTML) on the first photo only.
    async fn send_photo_group(
        &self,
        chat: &ChatId,
        photos: &[PhotoRef],
        caption: &str,
    ) -> Result<(), TransportError>;

    /// Downloads a received photo to `dest`.
    async fn download_photo(&self, file_id: &str, dest: &Path) -> Result<(), TransportError>;
}

/// Append-only table of submitted listings
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Writes the header row if the table is empty.
    async fn ensure_header(&self, headers: &[&str]) -> Result<(), StoreError>;

    async fn append_row(&self, row: &[String]) -> Result<(), StoreError>;
}

/// Scratch space for photos between upload and commit/cancel
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Fresh, unique path for a new photo.
    fn allocate(&self) -> PathBuf;

    /// Deletes the local copies. Failures are logged, never returned.
    async fn release(&self, photos: &[PhotoRef]);
}
