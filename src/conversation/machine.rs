use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Local;
use tokio::sync::mpsc::{self, error::SendError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::conversation::commit::{CommitOutcome, Committer};
use crate::conversation::keyboards;
use crate::conversation::sessions::{ConversationKey, Sessions};
use crate::conversation::state::{advance, prompt, rejection, Prompt, Session, State};
use crate::error::{Field, Reason, TransportError, ValidationError};
use crate::models::{PhotoRef, Stamp};
use crate::render::{render_listing, send_listing, Variant};
use crate::services::{Command, Incoming, Input, Keyboard, OutgoingText, PhotoStore, Transport};
use crate::texts::{buttons, fill, messages};

/// Drives every conversation: routes each inbound message to its session,
/// runs one step, and sends the replies.
pub struct Conversations {
    transport: Arc<dyn Transport>,
    photos: Arc<dyn PhotoStore>,
    committer: Committer,
    sessions: Sessions,
    /// Pending messages per conversation, drained by one worker task each
    queues: Mutex<HashMap<ConversationKey, UnboundedSender<Incoming>>>,
}

impl Conversations {
    pub fn new(
        transport: Arc<dyn Transport>,
        photos: Arc<dyn PhotoStore>,
        committer: Committer,
    ) -> Self {
        Self {
            transport,
            photos,
            committer,
            sessions: Sessions::new(),
            queues: Mutex::new(HashMap::new()),
        }
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Queues a message and returns at once. Messages of one conversation are
    /// handled in submission order by a worker that exits when its queue runs
    /// dry; other conversations run concurrently.
    pub fn submit(self: &Arc<Self>, incoming: Incoming) {
        let key = ConversationKey {
            chat_id: incoming.chat_id,
            user_id: incoming.sender.user_id,
        };
        let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        let incoming = match queues.get(&key) {
            Some(queue) => match queue.send(incoming) {
                Ok(()) => return,
                Err(SendError(incoming)) => incoming,
            },
            None => incoming,
        };

        let (queue, pending) = mpsc::unbounded_channel();
        queues.insert(key, queue);
        drop(queues);

        let this = Arc::clone(self);
        tokio::spawn(async move { this.drain(key, incoming, pending).await });
    }

    async fn drain(
        &self,
        key: ConversationKey,
        first: Incoming,
        mut pending: UnboundedReceiver<Incoming>,
    ) {
        let mut next = Some(first);
        while let Some(incoming) = next {
            if let Err(e) = self.dispatch(incoming).await {
                error!(chat_id = key.chat_id, error = %e, "Failed to handle message");
            }
            next = match pending.try_recv() {
                Ok(incoming) => Some(incoming),
                Err(_) => {
                    // Senders hold this lock, so nothing can slip in between
                    // the last check and the removal.
                    let mut queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
                    match pending.try_recv() {
                        Ok(incoming) => Some(incoming),
                        Err(_) => {
                            queues.remove(&key);
                            None
                        }
                    }
                }
            };
        }
    }

    /// Handles one inbound message. Steps of the same conversation run one
    /// at a time; an error means a reply could not be delivered.
    pub async fn dispatch(&self, incoming: Incoming) -> Result<(), TransportError> {
        let chat_id = incoming.chat_id;
        match &incoming.input {
            Input::Command(Command::Start) => {
                return self.send(OutgoingText::new(chat_id, messages::START)).await;
            }
            Input::Command(Command::Help) => {
                return self
                    .send(OutgoingText::new(chat_id, messages::HELP).html())
                    .await;
            }
            _ => {}
        }

        let key = ConversationKey {
            chat_id,
            user_id: incoming.sender.user_id,
        };
        let handle = self.sessions.handle(key);
        let mut session = handle.lock().await;
        let result = self.step(&mut session, &incoming).await;
        self.sessions.evict_if_idle(key, &handle, session.state);
        result
    }

    async fn step(
        &self,
        session: &mut Session,
        incoming: &Incoming,
    ) -> Result<(), TransportError> {
        let chat_id = incoming.chat_id;
        match (&incoming.input, session.state) {
            (Input::Command(Command::Post), _) => self.begin(session, chat_id).await,
            (Input::Command(Command::Cancel), State::Idle) => {
                self.send_with(chat_id, messages::OPERATION_CANCELED, Keyboard::Remove)
                    .await
            }
            (Input::Command(Command::Cancel), _) => self.cancel(session, chat_id).await,
            (_, State::Idle) => {
                debug!(chat_id, "Ignoring message outside a conversation");
                Ok(())
            }
            (Input::Command(Command::Preview), State::Photos) => {
                self.preview(session, chat_id).await
            }
            (Input::Command(command), state) => {
                debug!(chat_id, ?command, ?state, "Ignoring command inside a conversation");
                Ok(())
            }
            (input, State::Photos) => self.photos_step(session, chat_id, input).await,
            (input, State::Confirm) => self.confirm_step(session, chat_id, input).await,
            (input, state) => self.answer_step(session, chat_id, state, input, incoming).await,
        }
    }

    /// `/post`: start over with an empty draft.
    async fn begin(&self, session: &mut Session, chat_id: i64) -> Result<(), TransportError> {
        if session.state.is_active() {
            info!(chat_id, state = ?session.state, "Restarting listing conversation");
        } else {
            info!(chat_id, "Starting listing conversation");
        }
        let abandoned = session.draft.take_photos();
        self.photos.release(&abandoned).await;
        *session = Session::default();

        self.enter(session, chat_id, State::RentOrSell).await
    }

    /// Sends the prompt of `next` and moves there. The state only changes
    /// once the prompt went out.
    async fn enter(
        &self,
        session: &mut Session,
        chat_id: i64,
        next: State,
    ) -> Result<(), TransportError> {
        if let Some(prompt) = prompt(next) {
            self.send_prompt(chat_id, prompt).await?;
        }
        debug!(chat_id, from = ?session.state, to = ?next, "Conversation advanced");
        session.state = next;
        Ok(())
    }

    async fn answer_step(
        &self,
        session: &mut Session,
        chat_id: i64,
        state: State,
        input: &Input,
        incoming: &Incoming,
    ) -> Result<(), TransportError> {
        match advance(state, &mut session.draft, input, &incoming.sender) {
            Ok(next) => self.enter(session, chat_id, next).await,
            Err(err) => self.reject(chat_id, state, &err).await,
        }
    }

    async fn reject(
        &self,
        chat_id: i64,
        state: State,
        err: &ValidationError,
    ) -> Result<(), TransportError> {
        debug!(chat_id, ?state, error = %err, "Input rejected");
        self.send_prompt(chat_id, rejection(state, err)).await
    }

    async fn photos_step(
        &self,
        session: &mut Session,
        chat_id: i64,
        input: &Input,
    ) -> Result<(), TransportError> {
        match input {
            Input::Photo { file_id } => self.add_photo(session, chat_id, file_id).await,
            Input::Text(text) if text.trim() == buttons::PREVIEW.trim() => {
                self.preview(session, chat_id).await
            }
            _ => {
                let err = ValidationError::new(Field::Photo, Reason::NotAPhoto);
                self.reject(chat_id, State::Photos, &err).await
            }
        }
    }

    async fn add_photo(
        &self,
        session: &mut Session,
        chat_id: i64,
        file_id: &str,
    ) -> Result<(), TransportError> {
        if session.draft.photo_slots_left() == 0 {
            return self
                .send_with(chat_id, messages::MAX_PHOTOS, keyboards::PREVIEW_ONLY)
                .await;
        }

        let photo = PhotoRef {
            file_id: file_id.to_string(),
            path: self.photos.allocate(),
        };
        if let Err(e) = self.transport.download_photo(file_id, &photo.path).await {
            warn!(chat_id, file_id, error = %e, "Failed to download photo");
            self.photos.release(std::slice::from_ref(&photo)).await;
            return self
                .send_with(chat_id, messages::PHOTO_ERROR, keyboards::PREVIEW_ONLY)
                .await;
        }

        let reply = match session.draft.push_photo(photo.clone()) {
            Ok(0) => messages::ALL_PHOTOS_ADDED.to_string(),
            Ok(left) => format!(
                "{}\n\n{}",
                fill(messages::PHOTO_ADDED, left),
                messages::ASK_PHOTOS
            ),
            Err(e) => {
                self.photos.release(std::slice::from_ref(&photo)).await;
                warn!(chat_id, error = %e, "Photo rejected");
                messages::MAX_PHOTOS.to_string()
            }
        };
        debug!(chat_id, count = session.draft.photos().len(), "Photo added");
        self.send_with(chat_id, reply, keyboards::PREVIEW_ONLY).await
    }

    /// Renders the preview for the poster and asks for confirmation.
    async fn preview(&self, session: &mut Session, chat_id: i64) -> Result<(), TransportError> {
        session.draft.ensure_stamp(new_stamp);
        let listing = match session.draft.finalize() {
            Ok(listing) => listing,
            Err(e) => {
                error!(chat_id, error = %e, "Preview requested for an incomplete draft");
                return self.cancel(session, chat_id).await;
            }
        };

        let text = render_listing(&listing, Variant::Preview);
        let delivery =
            send_listing(self.transport.as_ref(), &chat_id.into(), &listing, &text).await?;
        debug!(chat_id, property_id = %listing.property_id, ?delivery, "Preview sent");

        self.enter(session, chat_id, State::Confirm).await
    }

    async fn confirm_step(
        &self,
        session: &mut Session,
        chat_id: i64,
        input: &Input,
    ) -> Result<(), TransportError> {
        let choice = match input {
            Input::Text(text) => text.trim(),
            _ => "",
        };
        if choice == buttons::CONFIRM.trim() {
            self.confirm(session, chat_id).await
        } else if choice == buttons::CANCEL.trim() {
            self.cancel(session, chat_id).await
        } else {
            debug!(chat_id, "Unexpected answer to confirmation, asking again");
            match prompt(State::Confirm) {
                Some(again) => self.send_prompt(chat_id, again).await,
                None => Ok(()),
            }
        }
    }

    /// Commits the draft. The session is reset whatever the outcome.
    async fn confirm(&self, session: &mut Session, chat_id: i64) -> Result<(), TransportError> {
        let finalized = session.draft.finalize();
        let photos = session.draft.take_photos();
        *session = Session::default();

        let listing = match finalized {
            Ok(listing) => listing,
            Err(e) => {
                error!(chat_id, error = %e, "Confirmation for an incomplete draft");
                self.photos.release(&photos).await;
                return self.send_with(chat_id, messages::CANCELED, Keyboard::Remove).await;
            }
        };

        let reply = match self.committer.commit(&listing).await {
            CommitOutcome::StoreFailed { detail } => fill(messages::SHEET_ERROR, detail),
            outcome => {
                info!(
                    chat_id,
                    property_id = %listing.property_id,
                    stored = outcome.is_stored(),
                    "✅ Listing submitted"
                );
                messages::SUCCESS.to_string()
            }
        };
        self.send_with(chat_id, reply, Keyboard::Remove).await
    }

    /// Discards the draft and its photos.
    async fn cancel(&self, session: &mut Session, chat_id: i64) -> Result<(), TransportError> {
        let photos = session.draft.take_photos();
        self.photos.release(&photos).await;
        *session = Session::default();
        info!(chat_id, released = photos.len(), "Listing conversation cancelled");

        self.send_with(chat_id, messages::CANCELED, Keyboard::Remove).await
    }

    async fn send_prompt(&self, chat_id: i64, prompt: Prompt) -> Result<(), TransportError> {
        self.send_with(chat_id, prompt.text, prompt.keyboard).await
    }

    async fn send_with(
        &self,
        chat_id: i64,
        text: impl Into<String>,
        keyboard: Keyboard,
    ) -> Result<(), TransportError> {
        self.send(OutgoingText::new(chat_id, text).keyboard(keyboard)).await
    }

    async fn send(&self, message: OutgoingText) -> Result<(), TransportError> {
        self.transport.send_text(&message).await
    }
}

/// Eight uppercase hex characters plus the current local time.
fn new_stamp() -> Stamp {
    let hex = Uuid::new_v4().simple().to_string();
    Stamp {
        property_id: hex[..8].to_uppercase(),
        created_at: Local::now(),
    }
}
