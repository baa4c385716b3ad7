//! Reply-thread preview shown under a message.

use serde::Serialize;

use crate::config::DEFAULT_THREAD_PREVIEW_LIMIT;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThreadSummary {
    /// Leading participants, in thread order.
    pub shown: Vec<String>,
    /// Participants not listed in `shown`.
    pub overflow: usize,
    pub reply_label: String,
}

/// "1 reply", "2 replies", "0 replies".
pub fn reply_label(thread_count: u32) -> String {
    if thread_count == 1 {
        format!("{} reply", thread_count)
    } else {
        format!("{} replies", thread_count)
    }
}

/// Summarize with the default preview limit of three participants.
///
/// Callers only show thread UI for `thread_count > 0`.
pub fn summarize(participants: &[String], thread_count: u32) -> ThreadSummary {
    summarize_with_limit(participants, thread_count, DEFAULT_THREAD_PREVIEW_LIMIT)
}

pub fn summarize_with_limit(participants: &[String], thread_count: u32, limit: usize) -> ThreadSummary {
    ThreadSummary {
        shown: participants.iter().take(limit).cloned().collect(),
        overflow: participants.len().saturating_sub(limit),
        reply_label: reply_label(thread_count),
    }
}
