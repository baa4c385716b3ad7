//! Chat message records as delivered by the message store.
//!
//! These are read-only inputs to the formatting pipeline. Field names follow
//! the store's JSON so records can be deserialized directly.

use serde::{Deserialize, Deserializer, Serialize};

/// Fallback display name when a user record carries no usable field.
pub const ANONYMOUS: &str = "Anonymous";

/// Extensions rendered inline as images rather than as file chips.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"];

/// Treat an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single stored chat message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_key", alias = "key", default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Absent or null text is treated as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default)]
    pub quoted_message: Option<Box<Message>>,
    #[serde(default)]
    pub code_sample: Option<CodeSample>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reactions: Vec<Reaction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thread_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thread_participants: Vec<String>,
}

impl Message {
    pub fn new(key: impl Into<String>, sender: impl Into<String>, timestamp: i64, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            sender: sender.into(),
            timestamp,
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_quote(mut self, quoted: Message) -> Self {
        self.quoted_message = Some(Box::new(quoted));
        self
    }

    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reactions.push(reaction);
        self
    }

    pub fn with_thread(mut self, count: u32, participants: Vec<String>) -> Self {
        self.thread_count = count;
        self.thread_participants = participants;
        self
    }
}

/// Snippet of code attached to a message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeSample {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub code: String,
}

/// File attached to a message, addressed either by URL or by blob id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

impl Attachment {
    /// Where the renderer should fetch the attachment from. URL wins over id.
    pub fn source(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.id.as_deref().filter(|i| !i.is_empty()))
    }

    pub fn kind(&self) -> AttachmentKind {
        let ext = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => AttachmentKind::Image,
            _ => AttachmentKind::File,
        }
    }
}

/// Emoji reaction and the users who applied it, in display order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<String>,
}

impl Reaction {
    pub fn new(emoji: impl Into<String>, users: &[&str]) -> Self {
        Self {
            emoji: emoji.into(),
            users: users.iter().map(|u| u.to_string()).collect(),
        }
    }
}

/// User record from the directory. Every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl UserProfile {
    /// Canonical display name.
    ///
    /// `firstname lastname` when both are set, else `username`, else the local
    /// part of `email`, else [`ANONYMOUS`]. Never fails.
    pub fn display_name(&self) -> String {
        if let (Some(first), Some(last)) = (non_blank(&self.firstname), non_blank(&self.lastname)) {
            return format!("{} {}", first, last);
        }
        if let Some(username) = non_blank(&self.username) {
            return username.to_string();
        }
        if let Some(email) = non_blank(&self.email) {
            let local = email.split('@').next().unwrap_or_default();
            if !local.is_empty() {
                return local.to_string();
            }
        }
        ANONYMOUS.to_string()
    }
}
