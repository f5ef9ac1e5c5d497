use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;

use crate::conversation::state::{Session, State};

/// Identity of one conversation: a user inside a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat_id: i64,
    pub user_id: i64,
}

pub type SessionHandle = Arc<AsyncMutex<Session>>;

/// Live sessions keyed by conversation.
///
/// Each session has its own async mutex, so messages of one conversation are
/// handled one at a time while other conversations proceed independently.
#[derive(Default)]
pub struct Sessions {
    inner: Mutex<HashMap<ConversationKey, SessionHandle>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for `key`, created idle if there is none.
    pub fn handle(&self, key: ConversationKey) -> SessionHandle {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(key).or_default().clone()
    }

    /// Drops the session for `key` once it is idle and nobody else is
    /// waiting on it. Call while still holding the session lock.
    pub fn evict_if_idle(&self, key: ConversationKey, handle: &SessionHandle, state: State) {
        if state.is_active() {
            return;
        }
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let unshared = map
            .get(&key)
            .is_some_and(|stored| Arc::ptr_eq(stored, handle) && Arc::strong_count(handle) == 2);
        if unshared {
            map.remove(&key);
        }
    }

    /// Copy of the current session, if one is live.
    pub async fn snapshot(&self, key: ConversationKey) -> Option<Session> {
        let handle = {
            let map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.get(&key).cloned()
        }?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
