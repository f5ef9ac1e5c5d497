pub mod commit;
pub mod keyboards;
pub mod machine;
pub mod sessions;
pub mod state;

pub use commit::{Channels, CommitOutcome, Committer};
pub use machine::Conversations;
pub use sessions::{ConversationKey, Sessions};
pub use state::{Session, State};
