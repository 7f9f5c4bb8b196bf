use super::Timestamped;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive-start, exclusive-end time range. An absent bound leaves that
/// side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// How a window is applied to a fetched listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Stop scanning at the first entry older than the window start.
    /// Requires newest-first input, see [`is_newest_first`].
    #[default]
    EarlyExit,
    /// Inspect every entry regardless of order.
    Exhaustive,
}

impl DateWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| start <= instant)
            && self.end.map_or(true, |end| instant < end)
    }

    fn before_start(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_some_and(|start| instant < start)
    }

    pub fn filter<T: Timestamped>(&self, entries: Vec<T>, policy: FilterPolicy) -> Vec<T> {
        if self.is_open() {
            return entries;
        }

        let total = entries.len();
        let kept: Vec<T> = match policy {
            FilterPolicy::Exhaustive => entries
                .into_iter()
                .filter(|entry| self.contains(entry.created_at()))
                .collect(),
            FilterPolicy::EarlyExit => entries
                .into_iter()
                .take_while(|entry| !self.before_start(entry.created_at()))
                .filter(|entry| self.contains(entry.created_at()))
                .collect(),
        };

        debug!(
            "Date window kept {} of {} entries ({:?})",
            kept.len(),
            total,
            policy
        );
        kept
    }
}

/// The ordering precondition of [`FilterPolicy::EarlyExit`]: creation times
/// never increase along the sequence.
pub fn is_newest_first<T: Timestamped>(entries: &[T]) -> bool {
    entries
        .windows(2)
        .all(|pair| pair[0].created_at() >= pair[1].created_at())
}
