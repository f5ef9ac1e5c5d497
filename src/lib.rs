pub mod config;
pub mod conversation;
pub mod error;
pub mod models;
pub mod normalize;
pub mod render;
pub mod services;
pub mod texts;
pub mod webhook;

pub use config::Config;
pub use conversation::{Channels, Committer, Conversations};
