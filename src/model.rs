use serde::{Deserialize, Serialize};
use time::serde::rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// A named conversation thread shown on the dashboard.
///
/// The title is immutable after creation; rooms are only ever created whole
/// and deleted whole.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Chatroom {
    pub id: String,
    pub title: String,
    #[serde(rename = "createdAt", with = "rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Chatroom {
    /// Create a room with a fresh opaque id.
    pub fn new(title: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// Message content. Exactly one of text or image per message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Body {
    Text { text: String },
    Image { image: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    #[serde(flatten)]
    pub body: Body,
    #[serde(with = "rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Message {
    pub fn text(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            body: Body::Text { text: text.into() },
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Build an image message from an already encoded data URI.
    pub fn image(sender: Sender, data_uri: impl Into<String>) -> Self {
        Self {
            sender,
            body: Body::Image {
                image: data_uri.into(),
            },
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.body {
            Body::Text { text } => Some(text),
            Body::Image { .. } => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.body, Body::Image { .. })
    }
}

/// One entry of the country directory used by the phone form.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    #[serde(rename = "dialCode")]
    pub dial_code: String,
    pub flag: String,
}
