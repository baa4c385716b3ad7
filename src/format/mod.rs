//! Turning stored messages into renderer-ready structures.
//!
//! [`MessageFormatting`] is the shared interface every chat surface uses;
//! [`Formatter`] implements it once and is held by value by whoever renders.

mod mentions;
mod segments;

pub use mentions::{resolve, Roster};
pub use segments::{link_display, tokenize, tokenize_with, Segment};

use std::fmt::{self, Write};

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

use crate::config::FormatConfig;
use crate::error::Result;
use crate::grouping::group_by_day;
use crate::message::{AttachmentKind, CodeSample, Message, Reaction};
use crate::reactions::{annotate, ReactionSummary};
use crate::theme::{initials, sender_color};
use crate::thread::{summarize_with_limit, ThreadSummary};

/// The message a reply quotes, parsed with the same rules as the reply.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedQuote {
    pub key: String,
    pub sender: String,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedAttachment {
    pub filename: String,
    pub source: Option<String>,
    pub kind: AttachmentKind,
}

/// Everything the renderer needs for one message; it does no parsing itself.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedMessage {
    pub key: String,
    pub sender: String,
    pub sender_color: &'static str,
    pub initials: String,
    pub time: String,
    pub segments: Vec<Segment>,
    pub quoted: Option<FormattedQuote>,
    pub code_sample: Option<CodeSample>,
    pub attachments: Vec<FormattedAttachment>,
    pub reactions: Vec<ReactionSummary>,
    /// Present only when the message has replies.
    pub thread: Option<ThreadSummary>,
}

/// A day bucket with its messages already formatted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormattedDay {
    pub label: String,
    pub timestamp: i64,
    pub messages: Vec<FormattedMessage>,
}

/// Formatting operations shared by every view that shows messages.
pub trait MessageFormatting {
    fn segments(&self, text: &str) -> Vec<Segment>;

    fn reactions(&self, reactions: &[Reaction]) -> Vec<ReactionSummary>;

    fn thread(&self, message: &Message) -> Option<ThreadSummary>;

    /// Time-of-day label for a unix timestamp in seconds.
    fn time_label(&self, timestamp: i64) -> String;

    fn quote(&self, quoted: &Message) -> FormattedQuote {
        FormattedQuote {
            key: quoted.key.clone(),
            sender: quoted.sender.clone(),
            segments: self.segments(&quoted.text),
        }
    }

    fn format_message(&self, message: &Message) -> FormattedMessage {
        FormattedMessage {
            key: message.key.clone(),
            sender: message.sender.clone(),
            sender_color: sender_color(&message.sender),
            initials: initials(&message.sender),
            time: self.time_label(message.timestamp),
            segments: self.segments(&message.text),
            quoted: message.quoted_message.as_deref().map(|q| self.quote(q)),
            code_sample: message.code_sample.clone(),
            attachments: message
                .attachments
                .iter()
                .map(|a| FormattedAttachment {
                    filename: a.filename.clone(),
                    source: a.source().map(String::from),
                    kind: a.kind(),
                })
                .collect(),
            reactions: self.reactions(&message.reactions),
            thread: self.thread(message),
        }
    }
}

/// The standard [`MessageFormatting`] implementation.
#[derive(Clone, Debug)]
pub struct Formatter<Tz: TimeZone = Local> {
    config: FormatConfig,
    roster: Roster,
    viewer: Option<String>,
    tz: Tz,
}

impl Formatter<Local> {
    pub fn new(config: FormatConfig, roster: Roster) -> Result<Self> {
        Self::with_timezone(config, roster, Local)
    }
}

impl<Tz: TimeZone> Formatter<Tz> {
    /// Fails when `config` does not pass [`FormatConfig::validate`].
    pub fn with_timezone(config: FormatConfig, roster: Roster, tz: Tz) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            roster,
            viewer: None,
            tz,
        })
    }

    /// Display name of the signed-in user, for reaction highlighting.
    pub fn with_viewer(mut self, viewer: impl Into<String>) -> Self {
        self.viewer = Some(viewer.into());
        self
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Swap in a refreshed roster; the user list is updated independently of messages.
    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = roster;
    }

    /// Group `messages` by day relative to `now` and format each one.
    pub fn format_days(&self, messages: &[Message], now: &DateTime<Tz>) -> Vec<FormattedDay>
    where
        Tz::Offset: fmt::Display,
    {
        group_by_day(messages, now)
            .into_iter()
            .map(|group| FormattedDay {
                label: group.label,
                timestamp: group.timestamp,
                messages: group.messages.into_iter().map(|m| self.format_message(m)).collect(),
            })
            .collect()
    }
}

impl<Tz: TimeZone> MessageFormatting for Formatter<Tz>
where
    Tz::Offset: fmt::Display,
{
    fn segments(&self, text: &str) -> Vec<Segment> {
        tokenize_with(text, &self.roster, &self.config)
    }

    fn reactions(&self, reactions: &[Reaction]) -> Vec<ReactionSummary> {
        annotate(reactions, self.viewer.as_deref())
    }

    fn thread(&self, message: &Message) -> Option<ThreadSummary> {
        (message.thread_count > 0).then(|| {
            summarize_with_limit(
                &message.thread_participants,
                message.thread_count,
                self.config.thread_preview_limit,
            )
        })
    }

    fn time_label(&self, timestamp: i64) -> String {
        let Some(sent) = DateTime::from_timestamp(timestamp, 0) else {
            return String::new();
        };
        let mut label = String::new();
        let local = sent.with_timezone(&self.tz);
        if write!(label, "{}", local.format(&self.config.time_format)).is_err() {
            tracing::warn!("Bad time format {:?}", self.config.time_format);
            label.clear();
        }
        label
    }
}
