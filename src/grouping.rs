//! Bucketing a message list into calendar days.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone};
use serde::Serialize;

use crate::message::Message;

pub const TODAY: &str = "Today";
pub const YESTERDAY: &str = "Yesterday";

/// All messages sent on one calendar day, in their original order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayGroup<'a> {
    pub label: String,
    /// Start of the day in milliseconds since the epoch.
    pub timestamp: i64,
    pub messages: Vec<&'a Message>,
}

/// "Today", "Yesterday", or e.g. "Friday, March 7" (year appended when it
/// differs from `today`'s).
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        TODAY.to_string()
    } else if today.pred_opt() == Some(day) {
        YESTERDAY.to_string()
    } else if day.year() == today.year() {
        day.format("%A, %B %-d").to_string()
    } else {
        day.format("%A, %B %-d, %Y").to_string()
    }
}

/// Milliseconds at local midnight starting `day`.
fn start_of_day_ms<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> i64 {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(start) => start.timestamp_millis(),
        // Midnight skipped by a DST transition
        None => tz.from_utc_datetime(&midnight).timestamp_millis(),
    }
}

/// Group messages by the calendar day of their timestamp in `now`'s time zone.
///
/// Groups come out ascending by day; messages inside a group keep their input
/// order. Timestamps chrono cannot represent are skipped.
pub fn group_by_day<'a, Tz: TimeZone>(messages: &'a [Message], now: &DateTime<Tz>) -> Vec<DayGroup<'a>> {
    let tz = now.timezone();
    let today = now.date_naive();
    let mut days: BTreeMap<NaiveDate, Vec<&'a Message>> = BTreeMap::new();

    for msg in messages {
        let Some(sent) = DateTime::from_timestamp(msg.timestamp, 0) else {
            tracing::warn!("Message {} has out-of-range timestamp {}, skipping", msg.key, msg.timestamp);
            continue;
        };
        let day = sent.with_timezone(&tz).date_naive();
        days.entry(day).or_default().push(msg);
    }

    tracing::trace!("Grouped {} messages into {} days", messages.len(), days.len());

    days.into_iter()
        .map(|(day, messages)| DayGroup {
            label: day_label(day, today),
            timestamp: start_of_day_ms(day, &tz),
            messages,
        })
        .collect()
}

/// [`group_by_day`] in the process-local time zone.
pub fn group_by_day_local(messages: &[Message]) -> Vec<DayGroup<'_>> {
    group_by_day(messages, &Local::now())
}
