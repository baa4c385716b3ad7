//! Talks message formatting library.
//!
//! Turns stored chat messages into renderer-ready structures: typed text
//! segments, day buckets, reaction summaries and thread previews. Every
//! function here is pure; transport and rendering live elsewhere.

pub mod config;
pub mod error;
pub mod format;
pub mod grouping;
pub mod message;
pub mod reactions;
pub mod theme;
pub mod thread;


pub use config::FormatConfig;
pub use error::FormatError;
pub use format::{Formatter, MessageFormatting, Roster, Segment};
pub use grouping::{group_by_day, DayGroup};
pub use message::{Message, Reaction, UserProfile};
pub use reactions::{annotate, ReactionSummary};
pub use thread::{summarize, ThreadSummary};
