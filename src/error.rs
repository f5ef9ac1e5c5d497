use std::fmt;

/// Draft field a validator is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RentOrSell,
    PropertyUse,
    HouseType,
    Rooms,
    Area,
    Location,
    Price,
    Info,
    Contact,
    Photo,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::RentOrSell => "rent_or_sell",
            Field::PropertyUse => "property_use",
            Field::HouseType => "house_type",
            Field::Rooms => "rooms",
            Field::Area => "area",
            Field::Location => "location",
            Field::Price => "price",
            Field::Info => "info",
            Field::Contact => "contact",
            Field::Photo => "photo",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Input is not one of the keyboard labels for this step.
    UnknownOption,
    TooShort { min: usize },
    InvalidCharacters,
    BadPhoneFormat,
    NotAPhoto,
    /// A photo or contact where a typed answer was expected.
    NotText,
}

/// Rejected user input. Never mutates the draft; the machine re-prompts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason:?}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: Reason,
}

impl ValidationError {
    pub fn new(field: Field, reason: Reason) -> Self {
        Self { field, reason }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Bot API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Only timeouts are worth re-issuing.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credentials error: {0}")]
    Credentials(String),

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("draft is missing {0}")]
    Missing(&'static str),
}
