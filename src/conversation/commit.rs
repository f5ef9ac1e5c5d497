use std::sync::Arc;

use tracing::{error, info};

use crate::models::{Listing, RentOrSell, StoredListing};
use crate::render::{render_listing, send_listing, Delivery, Variant};
use crate::services::{ChatId, ListingStore, PhotoStore, Transport};

/// Broadcast destinations by listing type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channels {
    pub rent: ChatId,
    pub sale: ChatId,
}

impl Channels {
    pub fn for_listing(&self, rent_or_sell: RentOrSell) -> &ChatId {
        match rent_or_sell {
            RentOrSell::Rent => &self.rent,
            RentOrSell::Sell => &self.sale,
        }
    }
}

/// Result of committing a confirmed listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Published { channel: ChatId, delivery: Delivery },
    /// Row stored, but neither the album nor the text fallback went out
    PublishFailed { channel: ChatId },
    /// Row not stored; nothing was published
    StoreFailed { detail: String },
}

impl CommitOutcome {
    pub fn is_stored(&self) -> bool {
        !matches!(self, CommitOutcome::StoreFailed { .. })
    }
}

/// Persists, publishes and cleans up a confirmed listing
pub struct Committer {
    transport: Arc<dyn Transport>,
    store: Arc<dyn ListingStore>,
    photos: Arc<dyn PhotoStore>,
    channels: Channels,
}

impl Committer {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn ListingStore>,
        photos: Arc<dyn PhotoStore>,
        channels: Channels,
    ) -> Self {
        Self {
            transport,
            store,
            photos,
            channels,
        }
    }

    /// Never fails: store errors are reported in the outcome, publish
    /// errors degrade to a text post, and the listing's photos are always
    /// released.
    pub async fn commit(&self, listing: &Listing) -> CommitOutcome {
        let outcome = self.store_and_publish(listing).await;
        self.photos.release(&listing.photos).await;
        outcome
    }

    async fn store_and_publish(&self, listing: &Listing) -> CommitOutcome {
        let row = StoredListing::from(listing).to_row();
        if let Err(e) = self.store.append_row(&row).await {
            error!(property_id = %listing.property_id, error = %e, "Failed to store listing");
            return CommitOutcome::StoreFailed {
                detail: e.to_string(),
            };
        }
        info!(property_id = %listing.property_id, "💾 Listing stored");

        let channel = self.channels.for_listing(listing.rent_or_sell).clone();
        let text = render_listing(listing, Variant::Channel);
        match send_listing(self.transport.as_ref(), &channel, listing, &text).await {
            Ok(delivery) => {
                info!(
                    property_id = %listing.property_id,
                    channel = %channel,
                    ?delivery,
                    "📢 Listing published"
                );
                CommitOutcome::Published { channel, delivery }
            }
            Err(e) => {
                error!(
                    property_id = %listing.property_id,
                    channel = %channel,
                    error = %e,
                    "Failed to publish listing"
                );
                CommitOutcome::PublishFailed { channel }
            }
        }
    }
}
