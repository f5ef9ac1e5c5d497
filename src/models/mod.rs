use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::texts::buttons;

/// Maximum number of photos attached to one listing
pub const MAX_PHOTOS: usize = 3;

/// Value stored for house type / rooms when the property use skips them
pub const NOT_APPLICABLE: &str = "N/A";

/// Declares a keyboard-backed choice: each variant has a canonical code (stored
/// in the sheet) and a localized button label (shown to users).
macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($code:literal, $label:path)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Match user input against the button labels, ignoring surrounding whitespace.
            pub fn from_label(input: &str) -> Option<Self> {
                let input = input.trim();
                Self::ALL.iter().copied().find(|v| v.label().trim() == input)
            }
        }
    };
}

choice!(
    /// Listing type; decides the broadcast channel
    RentOrSell {
        Rent => ("Rent", buttons::RENT),
        Sell => ("Sell", buttons::SELL),
    }
);

choice!(
    PropertyUse {
        Residence => ("Residence", buttons::RESIDENCE),
        Shop => ("Shop", buttons::SHOP),
        Office => ("Office", buttons::OFFICE),
        Cafe => ("Cafe", buttons::CAFE),
        Warehouse => ("Warehouse", buttons::WAREHOUSE),
        Other => ("Other", buttons::OTHER),
    }
);

impl PropertyUse {
    /// Warehouses and "other" uses have no meaningful house type or room count.
    pub fn needs_details(self) -> bool {
        !matches!(self, PropertyUse::Warehouse | PropertyUse::Other)
    }
}

choice!(
    HouseType {
        Traditional => ("Traditional", buttons::TRADITIONAL),
        Condominium => ("Condominium", buttons::CONDOMINIUM),
        Apartment => ("Apartment", buttons::APARTMENT),
        CompoundVilla => ("CompoundVilla", buttons::COMPOUND_VILLA),
    }
);

choice!(
    Rooms {
        SingleRoom => ("SingleRoom", buttons::SINGLE_ROOM),
        OneBedroom => ("OneBedroom", buttons::ONE_BEDROOM),
        TwoBedroom => ("TwoBedroom", buttons::TWO_BEDROOM),
        ThreeBedroom => ("ThreeBedroom", buttons::THREE_BEDROOM),
        MoreThanThree => ("MoreThanThree", buttons::MORE_THAN_THREE),
    }
);

choice!(
    /// Floor area bucket in square meters
    Area {
        Under15 => ("<15", buttons::AREA_SMALL),
        From16To25 => ("16-25", buttons::AREA_16_25),
        From26To50 => ("26-50", buttons::AREA_26_50),
        From51To75 => ("51-75", buttons::AREA_51_75),
        From76To110 => ("76-110", buttons::AREA_76_110),
        Over110 => (">110", buttons::AREA_LARGE),
    }
);

/// A detail that is either collected or skipped for the chosen property use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Detail<T> {
    Collected(T),
    NotApplicable,
}

impl<T: Copy> Detail<T> {
    pub fn collected(self) -> Option<T> {
        match self {
            Detail::Collected(value) => Some(value),
            Detail::NotApplicable => None,
        }
    }
}

/// Who submitted the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poster {
    pub user_id: i64,
    pub username: Option<String>,
}

impl Poster {
    /// Public handle when there is one, numeric id otherwise.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) => name.clone(),
            None => self.user_id.to_string(),
        }
    }

    /// Sheet form: `@handle` or the numeric id.
    pub fn sheet_name(&self) -> String {
        match &self.username {
            Some(name) => format!("@{name}"),
            None => self.user_id.to_string(),
        }
    }
}

/// A photo received from the user: the transport handle plus the local copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRef {
    pub file_id: String,
    pub path: PathBuf,
}

/// Identity assigned at the first preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub property_id: String,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("photo limit of {MAX_PHOTOS} reached")]
pub struct PhotoLimitReached;

/// In-progress listing for one conversation
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub rent_or_sell: Option<RentOrSell>,
    pub property_use: Option<PropertyUse>,
    pub house_type: Option<Detail<HouseType>>,
    pub rooms: Option<Detail<Rooms>>,
    pub area: Option<Area>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub info: Option<String>,
    pub contact: Option<String>,
    pub poster: Option<Poster>,
    photos: Vec<PhotoRef>,
    stamp: Option<Stamp>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the property use. Returns `true` when house type and rooms
    /// still have to be collected; otherwise both are marked not applicable.
    pub fn set_property_use(&mut self, property_use: PropertyUse) -> bool {
        self.property_use = Some(property_use);
        if property_use.needs_details() {
            self.house_type = None;
            self.rooms = None;
            true
        } else {
            self.house_type = Some(Detail::NotApplicable);
            self.rooms = Some(Detail::NotApplicable);
            false
        }
    }

    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    pub fn photo_slots_left(&self) -> usize {
        MAX_PHOTOS.saturating_sub(self.photos.len())
    }

    /// Appends a photo, returning how many more fit.
    pub fn push_photo(&mut self, photo: PhotoRef) -> Result<usize, PhotoLimitReached> {
        if self.photos.len() >= MAX_PHOTOS {
            return Err(PhotoLimitReached);
        }
        self.photos.push(photo);
        Ok(self.photo_slots_left())
    }

    /// Hands the photos over to whoever releases them.
    pub fn take_photos(&mut self) -> Vec<PhotoRef> {
        std::mem::take(&mut self.photos)
    }

    pub fn stamp(&self) -> Option<&Stamp> {
        self.stamp.as_ref()
    }

    /// Assigns the property id and creation time once; later calls keep the first stamp.
    pub fn ensure_stamp(&mut self, make: impl FnOnce() -> Stamp) -> &Stamp {
        self.stamp.get_or_insert_with(make)
    }

    /// Snapshot of a fully collected draft.
    pub fn finalize(&self) -> Result<Listing, DraftError> {
        let stamp = self.stamp.clone().ok_or(DraftError::Missing("property id"))?;
        Ok(Listing {
            property_id: stamp.property_id,
            created_at: stamp.created_at,
            rent_or_sell: self.rent_or_sell.ok_or(DraftError::Missing("rent or sell"))?,
            property_use: self.property_use.ok_or(DraftError::Missing("property use"))?,
            house_type: self.house_type.ok_or(DraftError::Missing("house type"))?,
            rooms: self.rooms.ok_or(DraftError::Missing("rooms"))?,
            area: self.area.ok_or(DraftError::Missing("area"))?,
            location: self.location.clone().ok_or(DraftError::Missing("location"))?,
            price: self.price.clone().ok_or(DraftError::Missing("price"))?,
            info: self.info.clone().ok_or(DraftError::Missing("info"))?,
            contact: self.contact.clone().ok_or(DraftError::Missing("contact"))?,
            poster: self.poster.clone().ok_or(DraftError::Missing("poster"))?,
            photos: self.photos.clone(),
        })
    }
}

/// A completed listing, ready to render or store
#[derive(Debug, Clone)]
pub struct Listing {
    pub property_id: String,
    pub created_at: DateTime<Local>,
    pub rent_or_sell: RentOrSell,
    pub property_use: PropertyUse,
    pub house_type: Detail<HouseType>,
    pub rooms: Detail<Rooms>,
    pub area: Area,
    pub location: String,
    pub price: String,
    pub info: String,
    pub contact: String,
    pub poster: Poster,
    pub photos: Vec<PhotoRef>,
}

impl Listing {
    pub fn date(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Column order of the listings sheet
pub const HEADERS: [&str; 15] = [
    "Property ID",
    "Rent/Sell",
    "Property Use",
    "House Type",
    "Rooms",
    "Area",
    "Location",
    "Price",
    "Additional Info",
    "Contact Info",
    "Posted By",
    "Date",
    "Photo 1",
    "Photo 2",
    "Photo 3",
];

/// The durable row written on confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredListing {
    pub property_id: String,
    pub rent_or_sell: String,
    pub property_use: String,
    pub house_type: String,
    pub rooms: String,
    pub area: String,
    pub location: String,
    pub price: String,
    pub info: String,
    pub contact: String,
    pub posted_by: String,
    pub date: String,
    pub photos: [String; MAX_PHOTOS],
}

impl StoredListing {
    pub fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.property_id.clone(),
            self.rent_or_sell.clone(),
            self.property_use.clone(),
            self.house_type.clone(),
            self.rooms.clone(),
            self.area.clone(),
            self.location.clone(),
            self.price.clone(),
            self.info.clone(),
            self.contact.clone(),
            self.posted_by.clone(),
            self.date.clone(),
        ];
        row.extend(self.photos.iter().cloned());
        row
    }
}

impl From<&Listing> for StoredListing {
    fn from(listing: &Listing) -> Self {
        let photos = std::array::from_fn(|i| {
            listing
                .photos
                .get(i)
                .map(|photo| photo.file_id.clone())
                .unwrap_or_default()
        });

        Self {
            property_id: listing.property_id.clone(),
            rent_or_sell: listing.rent_or_sell.code().to_string(),
            property_use: listing.property_use.code().to_string(),
            house_type: detail_code(listing.house_type, HouseType::code),
            rooms: detail_code(listing.rooms, Rooms::code),
            area: listing.area.code().to_string(),
            location: listing.location.clone(),
            price: listing.price.clone(),
            info: listing.info.clone(),
            contact: listing.contact.clone(),
            posted_by: listing.poster.sheet_name(),
            date: listing.date(),
            photos,
        }
    }
}

fn detail_code<T: Copy>(detail: Detail<T>, code: fn(T) -> &'static str) -> String {
    detail
        .collected()
        .map(code)
        .unwrap_or(NOT_APPLICABLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn photo(n: usize) -> PhotoRef {
        PhotoRef {
            file_id: format!("file-{n}"),
            path: PathBuf::from(format!("photo_{n}.jpg")),
        }
    }

    fn stamp() -> Stamp {
        Stamp {
            property_id: "AB12CD34".to_string(),
            created_at: Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap(),
        }
    }

    fn complete_draft() -> Draft {
        let mut draft = Draft::new();
        draft.rent_or_sell = Some(RentOrSell::Rent);
        draft.set_property_use(PropertyUse::Warehouse);
        draft.area = Some(Area::Over110);
        draft.location = Some("Bole".to_string());
        draft.price = Some("40,000".to_string());
        draft.info = Some("near the ring road".to_string());
        draft.contact = Some(" 0911223344".to_string());
        draft.poster = Some(Poster {
            user_id: 42,
            username: None,
        });
        draft
    }

    #[test]
    fn labels_match_after_trimming() {
        assert_eq!(
            HouseType::from_label("🏡 #ግቢ_ቤት"),
            Some(HouseType::Traditional)
        );
        assert_eq!(Rooms::from_label(" 🛏️ #ባለ_1_መኝታ "), Some(Rooms::OneBedroom));
        assert_eq!(RentOrSell::from_label("rent"), None);
    }

    #[test]
    fn warehouse_and_other_skip_details() {
        for use_ in PropertyUse::ALL {
            let mut draft = Draft::new();
            let needs = draft.set_property_use(*use_);
            if matches!(use_, PropertyUse::Warehouse | PropertyUse::Other) {
                assert!(!needs);
                assert_eq!(draft.house_type, Some(Detail::NotApplicable));
                assert_eq!(draft.rooms, Some(Detail::NotApplicable));
            } else {
                assert!(needs);
                assert_eq!(draft.house_type, None);
                assert_eq!(draft.rooms, None);
            }
        }
    }

    #[test]
    fn photos_are_capped() {
        let mut draft = Draft::new();
        assert_eq!(draft.push_photo(photo(1)), Ok(2));
        assert_eq!(draft.push_photo(photo(2)), Ok(1));
        assert_eq!(draft.push_photo(photo(3)), Ok(0));
        assert_eq!(draft.push_photo(photo(4)), Err(PhotoLimitReached));
        assert_eq!(draft.photos().len(), 3);
        assert_eq!(draft.photos()[0].file_id, "file-1");
    }

    #[test]
    fn stamp_is_assigned_once() {
        let mut draft = Draft::new();
        let first = draft.ensure_stamp(stamp).clone();
        let second = draft
            .ensure_stamp(|| Stamp {
                property_id: "FFFFFFFF".to_string(),
                created_at: Local::now(),
            })
            .clone();
        assert_eq!(first, second);
    }

    #[test]
    fn finalize_requires_every_field() {
        let mut draft = complete_draft();
        assert_eq!(
            draft.finalize().unwrap_err(),
            DraftError::Missing("property id")
        );
        draft.ensure_stamp(stamp);
        draft.contact = None;
        assert_eq!(draft.finalize().unwrap_err(), DraftError::Missing("contact"));
    }

    #[test]
    fn stored_row_follows_header_order() {
        let mut draft = complete_draft();
        draft.push_photo(photo(1)).unwrap();
        draft.ensure_stamp(stamp);
        let listing = draft.finalize().unwrap();

        let row = StoredListing::from(&listing).to_row();
        assert_eq!(row.len(), HEADERS.len());
        assert_eq!(
            row,
            vec![
                "AB12CD34",
                "Rent",
                "Warehouse",
                "N/A",
                "N/A",
                ">110",
                "Bole",
                "40,000",
                "near the ring road",
                " 0911223344",
                "42",
                "2024-03-01 09:05",
                "file-1",
                "",
                "",
            ]
        );
    }

    #[test]
    fn sheet_name_prefers_handle() {
        let poster = Poster {
            user_id: 7,
            username: Some("abebe".to_string()),
        };
        assert_eq!(poster.sheet_name(), "@abebe");
        assert_eq!(poster.display_name(), "abebe");
    }
}
