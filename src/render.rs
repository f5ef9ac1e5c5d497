use tracing::{error, warn};

use crate::error::TransportError;
use crate::models::Listing;
use crate::services::{ChatId, OutgoingText, Transport};
use crate::texts::{fill, messages};

/// Which audience a rendered listing is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Shown to the poster before confirming; carries the property id
    Preview,
    /// Broadcast to the public channel
    Channel,
}

/// How a listing actually went out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    PhotoGroup,
    Text,
    /// Photo group failed, text went out instead
    TextFallback,
}

/// Escapes HTML special characters in user-supplied text.
pub fn escape_html(raw: &str) -> String {
    html_escape::encode_safe(raw).into_owned()
}

/// Builds the HTML text block for a listing.
pub fn render_listing(listing: &Listing, variant: Variant) -> String {
    let line = |template: &str, value: &str| fill(template, escape_html(value));

    let mut text = String::from(messages::PREVIEW_TITLE);
    if variant == Variant::Preview {
        text += &line(messages::PROPERTY_ID, &listing.property_id);
    }
    text += &line(messages::RENT_OR_SELL, listing.rent_or_sell.label());
    text += &line(messages::PROPERTY_USE, listing.property_use.label());
    if let Some(house_type) = listing.house_type.collected() {
        text += &line(messages::HOUSE_TYPE, house_type.label());
    }
    if let Some(rooms) = listing.rooms.collected() {
        text += &line(messages::ROOMS, rooms.label());
    }
    text += &line(messages::AREA, listing.area.label());
    text += &line(messages::LOCATION, &listing.location);
    text += &line(messages::PRICE, &listing.price);
    text += &line(messages::DETAILS, &listing.info);
    text += &line(messages::CONTACT, &listing.contact);
    text += &line(messages::POSTED_BY, &listing.poster.display_name());
    text += &line(messages::DATE, &listing.date());
    text += "\n\n";
    text += messages::FOOTER;
    text
}

/// Sends a rendered listing: as a photo album captioned on the first photo
/// when there are photos, standalone text otherwise. A failed album is
/// retried as plain text.
pub async fn send_listing(
    transport: &dyn Transport,
    chat: &ChatId,
    listing: &Listing,
    text: &str,
) -> Result<Delivery, TransportError> {
    if listing.photos.is_empty() {
        transport
            .send_text(&OutgoingText::new(chat.clone(), text).html())
            .await?;
        return Ok(Delivery::Text);
    }

    match transport.send_photo_group(chat, &listing.photos, text).await {
        Ok(()) => Ok(Delivery::PhotoGroup),
        Err(e) => {
            warn!(chat = %chat, error = %e, "Photo group failed, sending text only");
            transport
                .send_text(&OutgoingText::new(chat.clone(), text).html())
                .await
                .inspect_err(|e| error!(chat = %chat, error = %e, "Text fallback failed"))?;
            Ok(Delivery::TextFallback)
        }
    }
}
