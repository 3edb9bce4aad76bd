//! Testing utilities for vitrine
//!
//! Fixtures and fakes shared by the unit tests:
//!
//! - `sample_item` / `titled_items`: deterministic items around `fixed_now()`
//! - `FakeSource`: in-memory `ContentSource` with per-call delays and failure injection
//! - `RecordingNotifier`: captures user-visible notices
//! - `RecordingHost`: counts key listener attach/detach calls
//!
//! Only available when compiled with `cfg(test)`.

use crate::browse::{KeyboardHost, ListenerId};
use crate::model::{Item, ItemId};
use crate::notify::{NoticeKind, Notifier};
use crate::source::{ContentSource, SourceError};
use async_trait::async_trait;
use chrono::{DateTime, Duration as Days, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Reference instant used by every fixture
///
/// # Panics
/// Never: the literal date is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

/// Plain item titled "Item {id}", created a day before `fixed_now()`
#[must_use]
pub fn sample_item(id: &str) -> Item {
    Item::new(id, format!("Item {id}"), fixed_now() - Days::days(1))
}

/// One item per title; ids are "i0", "i1", ... and creation times increase with the index
#[must_use]
pub fn titled_items(titles: &[&str]) -> Vec<Item> {
    titles
        .iter()
        .zip(0_i64..)
        .map(|(title, i)| Item::new(format!("i{i}"), *title, fixed_now() - Days::days(30 - i)))
        .collect()
}

/// In-memory content source
///
/// View counts start from each item's `view_count`. Reads snapshot the count
/// when issued and deliver it after their delay, modelling a response in flight.
pub struct FakeSource {
    items: Vec<Item>,
    counts: Mutex<HashMap<ItemId, u64>>,
    fetch_delay: Duration,
    read_delays: Mutex<VecDeque<Duration>>,
    fail_fetch: bool,
    fail_increments: bool,
    atomic: bool,
    fetch_calls: AtomicU64,
    increment_calls: AtomicU64,
    read_calls: AtomicU64,
}

impl FakeSource {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        let counts = items
            .iter()
            .map(|item| (item.id.clone(), item.view_count.unwrap_or(0)))
            .collect();
        Self {
            items,
            counts: Mutex::new(counts),
            fetch_delay: Duration::ZERO,
            read_delays: Mutex::new(VecDeque::new()),
            fail_fetch: false,
            fail_increments: false,
            atomic: false,
            fetch_calls: AtomicU64::new(0),
            increment_calls: AtomicU64::new(0),
            read_calls: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Delays applied to successive reads, in call order
    #[must_use]
    pub fn with_read_delays(self, delays: Vec<Duration>) -> Self {
        Self {
            read_delays: Mutex::new(delays.into()),
            ..self
        }
    }

    #[must_use]
    pub const fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    #[must_use]
    pub const fn failing_increments(mut self) -> Self {
        self.fail_increments = true;
        self
    }

    /// Support `increment_and_read`
    #[must_use]
    pub const fn with_atomic(mut self) -> Self {
        self.atomic = true;
        self
    }

    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    pub fn increment_calls(&self) -> u64 {
        self.increment_calls.load(Ordering::Relaxed)
    }

    pub fn read_calls(&self) -> u64 {
        self.read_calls.load(Ordering::Relaxed)
    }

    pub async fn count(&self, id: &str) -> Option<u64> {
        self.counts.lock().await.get(&ItemId::new(id)).copied()
    }

    async fn bump(&self, id: &ItemId) -> Result<u64, SourceError> {
        self.increment_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_increments {
            return Err(SourceError::Unavailable("increment rejected".to_string()));
        }
        let mut counts = self.counts.lock().await;
        let count = counts
            .get_mut(id)
            .ok_or_else(|| SourceError::NotFound(id.clone()))?;
        *count += 1;
        Ok(*count)
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    type Item = Item;

    async fn fetch_all(&self) -> Result<Vec<Item>, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        if self.fail_fetch {
            return Err(SourceError::Unavailable("fetch rejected".to_string()));
        }
        Ok(self.items.clone())
    }

    async fn increment_view_count(&self, id: &ItemId) -> Result<(), SourceError> {
        self.bump(id).await.map(|_| ())
    }

    async fn read_view_count(&self, id: &ItemId) -> Result<u64, SourceError> {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        let snapshot = self
            .counts
            .lock()
            .await
            .get(id)
            .copied()
            .ok_or_else(|| SourceError::NotFound(id.clone()))?;
        let delay = self.read_delays.lock().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn increment_and_read(&self, id: &ItemId) -> Result<u64, SourceError> {
        if !self.atomic {
            return Err(SourceError::Unsupported);
        }
        self.bump(id).await
    }
}

/// Notifier that keeps every notice
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: std::sync::Mutex<Vec<(NoticeKind, String)>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push((kind, message.to_string()));
        }
    }
}

/// Keyboard host that only counts
#[derive(Debug, Default)]
pub struct RecordingHost {
    next_id: AtomicU64,
    attached: AtomicUsize,
    detached: AtomicUsize,
}

impl RecordingHost {
    pub fn attached(&self) -> usize {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn detached(&self) -> usize {
        self.detached.load(Ordering::SeqCst)
    }

    /// Listeners currently attached
    pub fn active(&self) -> usize {
        self.attached() - self.detached()
    }
}

impl KeyboardHost for RecordingHost {
    fn attach(&self) -> ListenerId {
        self.attached.fetch_add(1, Ordering::SeqCst);
        ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn detach(&self, _id: ListenerId) {
        self.detached.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titled_items_are_ordered_by_index() {
        let items = titled_items(&["b", "a"]);
        assert_eq!(items[0].id.as_str(), "i0");
        assert!(items[0].created_at < items[1].created_at);
    }

    #[tokio::test]
    async fn test_fake_source_counts() {
        let source = FakeSource::new(vec![sample_item("a").with_view_count(3)]);
        source.increment_view_count(&ItemId::new("a")).await.unwrap();
        assert_eq!(source.count("a").await, Some(4));
        assert!(matches!(
            source.increment_and_read(&ItemId::new("a")).await,
            Err(SourceError::Unsupported)
        ));
    }
}
