#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use house_listing_bot::conversation::{ConversationKey, State};
use house_listing_bot::error::{StoreError, TransportError};
use house_listing_bot::models::{PhotoRef, Poster};
use house_listing_bot::services::{
    ChatId, Incoming, Input, ListingStore, LocalPhotoStore, OutgoingText, Transport,
};
use house_listing_bot::texts::buttons;
use house_listing_bot::{Channels, Committer, Conversations};

pub const CHAT: i64 = 100;
pub const USER: i64 = 200;

pub fn rent_channel() -> ChatId {
    ChatId::Channel("@rentals".to_string())
}

pub fn sale_channel() -> ChatId {
    ChatId::Channel("@sales".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(OutgoingText),
    Group {
        chat: ChatId,
        photos: Vec<PhotoRef>,
        caption: String,
    },
}

/// Records everything sent; downloads write a tiny fake JPEG.
#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<Sent>>,
    pub fail_groups: AtomicBool,
    pub fail_downloads: AtomicBool,
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send_text(&self, message: &OutgoingText) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(Sent::Text(message.clone()));
        Ok(())
    }

    async fn send_photo_group(
        &self,
        chat: &ChatId,
        photos: &[PhotoRef],
        caption: &str,
    ) -> Result<(), TransportError> {
        if self.fail_groups.load(Ordering::SeqCst) {
            return Err(TransportError::Api {
                code: 400,
                description: "Bad Request: failed to send media group".to_string(),
            });
        }
        self.sent.lock().unwrap().push(Sent::Group {
            chat: chat.clone(),
            photos: photos.to_vec(),
            caption: caption.to_string(),
        });
        Ok(())
    }

    async fn download_photo(&self, _file_id: &str, dest: &Path) -> Result<(), TransportError> {
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(TransportError::Timeout);
        }
        tokio::fs::write(dest, b"\xFF\xD8\xFF\xD9").await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub rows: Mutex<Vec<Vec<String>>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn ensure_header(&self, headers: &[&str]) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.is_empty() {
            rows.push(headers.iter().map(|h| h.to_string()).collect());
        }
        Ok(())
    }

    async fn append_row(&self, row: &[String]) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 403,
                body: "The caller does not have permission".to_string(),
            });
        }
        self.rows.lock().unwrap().push(row.to_vec());
        Ok(())
    }
}

pub struct Harness {
    pub transport: Arc<FakeTransport>,
    pub store: Arc<MemoryStore>,
    pub conversations: Arc<Conversations>,
    pub photo_dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let transport = Arc::new(FakeTransport::default());
        let store = Arc::new(MemoryStore::default());
        let photo_dir = tempfile::tempdir().unwrap();
        let photos = Arc::new(LocalPhotoStore::new(photo_dir.path()));
        let committer = Committer::new(
            transport.clone(),
            store.clone(),
            photos.clone(),
            Channels {
                rent: rent_channel(),
                sale: sale_channel(),
            },
        );
        let conversations = Arc::new(Conversations::new(transport.clone(), photos, committer));
        Self {
            transport,
            store,
            conversations,
            photo_dir,
        }
    }

    pub fn sender() -> Poster {
        Poster {
            user_id: USER,
            username: Some("seller".to_string()),
        }
    }

    pub async fn text(&self, text: &str) {
        self.conversations
            .dispatch(Incoming::text(CHAT, Self::sender(), text))
            .await
            .unwrap();
    }

    pub async fn photo(&self, file_id: &str) {
        self.input(Input::Photo {
            file_id: file_id.to_string(),
        })
        .await;
    }

    pub async fn contact(&self, phone: &str) {
        self.input(Input::Contact {
            phone_number: phone.to_string(),
        })
        .await;
    }

    pub async fn input(&self, input: Input) {
        self.conversations
            .dispatch(Incoming::new(CHAT, Self::sender(), input))
            .await
            .unwrap();
    }

    pub async fn state(&self) -> State {
        self.conversations
            .sessions()
            .snapshot(ConversationKey {
                chat_id: CHAT,
                user_id: USER,
            })
            .await
            .map(|session| session.state)
            .unwrap_or(State::Idle)
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.transport.sent.lock().unwrap().clone()
    }

    pub fn clear_sent(&self) {
        self.transport.sent.lock().unwrap().clear();
    }

    /// Text of the most recent plain message.
    pub fn last_text(&self) -> String {
        self.sent()
            .iter()
            .rev()
            .find_map(|sent| match sent {
                Sent::Text(message) => Some(message.text.clone()),
                Sent::Group { .. } => None,
            })
            .unwrap_or_default()
    }

    /// Everything delivered to `chat`.
    pub fn sent_to(&self, chat: &ChatId) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|sent| match sent {
                Sent::Text(message) => &message.chat == chat,
                Sent::Group { chat: to, .. } => to == chat,
            })
            .collect()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.store.rows.lock().unwrap().clone()
    }

    pub fn photo_files(&self) -> usize {
        std::fs::read_dir(self.photo_dir.path()).unwrap().count()
    }

    /// Answers every question of a residence listing up to (not including) `target`.
    pub async fn advance_to(&self, rent_or_sell: &str, target: State) {
        self.text("/post").await;
        let answers: [(State, &str); 9] = [
            (State::RentOrSell, rent_or_sell),
            (State::PropertyUse, buttons::RESIDENCE),
            (State::HouseType, buttons::CONDOMINIUM),
            (State::Rooms, buttons::TWO_BEDROOM),
            (State::Area, buttons::AREA_51_75),
            (State::Location, "Bole, near Edna Mall"),
            (State::Price, "15,000"),
            (State::Info, "Water tank & parking"),
            (State::Contact, "0911223344"),
        ];
        for (state, answer) in answers {
            if state == target {
                break;
            }
            assert_eq!(self.state().await, state);
            self.text(answer).await;
        }
        if target == State::Confirm {
            self.text(buttons::PREVIEW).await;
        }
        assert_eq!(self.state().await, target);
    }
}
