use std::fmt;

use serde::Serialize;

use crate::models::Poster;

/// Destination of an outbound message: a private chat or a channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Channel(String),
}

impl ChatId {
    /// Numeric ids (`-100...`) stay numeric; anything else (`@name`) is a channel handle.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(id) => ChatId::Id(id),
            Err(_) => ChatId::Channel(raw.to_string()),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{id}"),
            ChatId::Channel(name) => f.write_str(name),
        }
    }
}

/// Reply keyboard attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// One-time keyboard of label rows
    Choices(&'static [&'static [&'static str]]),
    /// Single button asking the client to share the user's phone number
    RequestContact(&'static str),
    Remove,
}

/// A text message to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingText {
    pub chat: ChatId,
    pub text: String,
    /// Text carries HTML markup
    pub html: bool,
    pub keyboard: Option<Keyboard>,
}

impl OutgoingText {
    pub fn new(chat: impl Into<ChatId>, text: impl Into<String>) -> Self {
        Self {
            chat: chat.into(),
            text: text.into(),
            html: false,
            keyboard: None,
        }
    }

    pub fn html(mut self) -> Self {
        self.html = true;
        self
    }

    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Bot commands understood anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Post,
    Cancel,
    Help,
    Preview,
    Other(String),
}

impl Command {
    /// Parses `/name` or `/name@botname`, ignoring arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim().split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        let command = match name {
            "start" => Command::Start,
            "post" => Command::Post,
            "cancel" => Command::Cancel,
            "help" => Command::Help,
            "preview" => Command::Preview,
            other => Command::Other(other.to_string()),
        };
        Some(command)
    }
}

/// What the user sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Text(String),
    Photo { file_id: String },
    Contact { phone_number: String },
    Unsupported,
}

/// An inbound message handed to the conversation machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub chat_id: i64,
    pub sender: Poster,
    pub input: Input,
}

impl Incoming {
    pub fn new(chat_id: i64, sender: Poster, input: Input) -> Self {
        Self {
            chat_id,
            sender,
            input,
        }
    }

    /// Text-or-command constructor; `/...` becomes a command.
    pub fn text(chat_id: i64, sender: Poster, text: &str) -> Self {
        let input = match Command::parse(text) {
            Some(command) => Input::Command(command),
            None => Input::Text(text.to_string()),
        };
        Self::new(chat_id, sender, input)
    }
}
