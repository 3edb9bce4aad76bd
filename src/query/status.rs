//! Deadline-derived status
//!
//! Status is never stored on a record; it is derived from the deadline relative
//! to an explicit "now" so that evaluation stays deterministic. The deadline
//! instant itself already counts as closed.

use crate::model::Record;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Days before the deadline during which an open item is flagged urgent
pub const URGENT_WINDOW_DAYS: u32 = 7;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Time-dependent status of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Closed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// Emphasis tier for items with a deadline (UI only, never used for filtering on its own)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrgencyTier {
    /// Zero days remaining: expired, or closing today
    LastDay,
    /// 1 to 7 days remaining
    Urgent,
    /// More than 7 days remaining
    Normal,
}

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant (tests, `--now` on the CLI)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Status of a record at `now`
#[must_use]
pub fn derive_status<R: Record>(item: &R, now: DateTime<Utc>) -> Status {
    status_for_deadline(item.deadline(), now)
}

/// Status for an optional deadline: no deadline stays active forever
#[must_use]
pub fn status_for_deadline(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Status {
    match deadline {
        Some(deadline) if deadline <= now => Status::Closed,
        _ => Status::Active,
    }
}

/// Whole days until the deadline, rounded up and floored at zero
#[must_use]
pub fn days_remaining<R: Record>(item: &R, now: DateTime<Utc>) -> Option<u32> {
    item.deadline().map(|deadline| days_until(deadline, now))
}

/// `ceil((deadline - now) / 1 day)`, never negative
#[must_use]
pub fn days_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (deadline - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let days = (millis + DAY_MILLIS - 1) / DAY_MILLIS;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Urgency tier for a number of remaining days
#[must_use]
pub const fn tier_for_days(days: u32) -> UrgencyTier {
    match days {
        0 => UrgencyTier::LastDay,
        1..=URGENT_WINDOW_DAYS => UrgencyTier::Urgent,
        _ => UrgencyTier::Normal,
    }
}

/// Urgency tier of a record; `None` without a deadline
#[must_use]
pub fn urgency<R: Record>(item: &R, now: DateTime<Utc>) -> Option<UrgencyTier> {
    days_remaining(item, now).map(tier_for_days)
}

/// Active and inside the urgency window
#[must_use]
pub fn is_closing_soon<R: Record>(item: &R, now: DateTime<Utc>) -> bool {
    derive_status(item, now) == Status::Active && urgency(item, now) == Some(UrgencyTier::Urgent)
}

/// Disjoint status counts over a collection (summary cards of the contests page)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Deadline more than the urgency window away
    pub open: usize,
    /// Deadline inside the urgency window
    pub closing_soon: usize,
    /// Deadline reached
    pub closed: usize,
    /// No deadline at all
    pub no_deadline: usize,
}

impl StatusCounts {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.open + self.closing_soon + self.closed + self.no_deadline
    }
}

/// Count items per status at `now`
#[must_use]
pub fn status_counts<'a, R, I>(items: I, now: DateTime<Utc>) -> StatusCounts
where
    R: Record,
    I: IntoIterator<Item = &'a R>,
{
    items
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, item| {
            match (item.deadline(), derive_status(item, now)) {
                (None, _) => counts.no_deadline += 1,
                (Some(_), Status::Closed) => counts.closed += 1,
                (Some(_), Status::Active) if is_closing_soon(item, now) => counts.closing_soon += 1,
                (Some(_), Status::Active) => counts.open += 1,
            }
            counts
        })
}
