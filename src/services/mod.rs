pub mod photos;
pub mod retry;
pub mod sheets;
pub mod telegram;
pub mod traits;
pub mod types;

pub use photos::LocalPhotoStore;
pub use retry::{retry, RetryPolicy};
pub use sheets::SheetsStore;
pub use telegram::{TelegramClient, Update};
pub use traits::{ListingStore, PhotoStore, Transport};
pub use types::{ChatId, Command, Incoming, Input, Keyboard, OutgoingText};
