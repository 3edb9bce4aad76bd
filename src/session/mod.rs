//! Page session - one listing page visit
//!
//! A `PageSession` owns everything a listing page needs for one visit: the
//! fetched collection, the current criteria, sort key and page, the view mode,
//! the media browser and the view counter. Pages differ only by their
//! `PageSettings`.
//!
//! # Architecture
//!
//! - Single owner: every mutation goes through `&mut self`, no interior locking
//! - Criteria and sort changes recompute the result list synchronously and reset
//!   the page to 1
//! - The result list holds indices into the collection, so view-count patches
//!   show up in every view without a recompute (ordering is refreshed on the
//!   next criteria or sort change)
//! - The session owns a `CancellationToken`; the initial fetch races it and view
//!   counter tasks race a child token. `unmount` or drop cancels it.

pub mod error;

pub use error::{Result, SessionError};

use crate::browse::{BrowserKey, BrowserState, KeyOutcome, KeyboardHost, MediaBrowser, MediaDisplay};
use crate::counter::{CountProtocol, ViewCounter};
use crate::export::{ExportRow, Exporter};
use crate::model::{Collection, ItemId, Media, Record};
use crate::notify::{NoticeKind, Notifier, TracingNotifier};
use crate::profile::{PageProfile, PageSettings};
use crate::query::{
    Clock, FacetCount, FacetSelection, FilterCriteria, Page, PaginationState, QueryEngine,
    SortKey, StatusCounts, StatusTab, SystemClock, page_window, status_counts,
};
use crate::source::ContentSource;
use crate::view::{ViewMode, ViewModeController};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Progress of the initial fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// Fetch failed; the collection stays empty and is never retried
    Failed(String),
    /// Session was unmounted before the fetch completed
    Cancelled,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Builder for `PageSession`
#[must_use]
pub struct PageSessionBuilder<S> {
    source: Arc<S>,
    settings: PageSettings,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    host: Option<Arc<dyn KeyboardHost>>,
    protocol: CountProtocol,
    view_mode: ViewMode,
}

impl<S: ContentSource> PageSessionBuilder<S> {
    pub fn settings(mut self, settings: PageSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn keyboard_host(mut self, host: Arc<dyn KeyboardHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub const fn protocol(mut self, protocol: CountProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub const fn view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    pub fn build(self) -> PageSession<S> {
        let token = CancellationToken::new();
        let counter = ViewCounter::new(Arc::clone(&self.source), self.protocol, token.child_token());
        let browser = match self.host {
            Some(host) => MediaBrowser::with_host(host),
            None => MediaBrowser::new(),
        };

        PageSession {
            settings: self.settings,
            source: self.source,
            notifier: self.notifier,
            clock: self.clock,
            token,
            load_state: LoadState::Idle,
            collection: Collection::empty(),
            criteria: FilterCriteria::default(),
            sort_key: self.settings.default_sort,
            pagination: PaginationState::new(self.settings.page_size),
            view: ViewModeController::new(self.view_mode),
            browser,
            counter,
            results: Vec::new(),
        }
    }
}

pub struct PageSession<S: ContentSource> {
    settings: PageSettings,
    source: Arc<S>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    token: CancellationToken,
    load_state: LoadState,
    collection: Collection<S::Item>,
    criteria: FilterCriteria,
    sort_key: SortKey,
    pagination: PaginationState,
    view: ViewModeController,
    browser: MediaBrowser<S::Item>,
    counter: ViewCounter<S>,
    results: Vec<usize>,
}

impl<S: ContentSource> PageSession<S> {
    /// Start building a session for `profile` backed by `source`
    pub fn builder(source: Arc<S>, profile: PageProfile) -> PageSessionBuilder<S> {
        PageSessionBuilder {
            source,
            settings: profile.into(),
            notifier: Arc::new(TracingNotifier),
            clock: Arc::new(SystemClock),
            host: None,
            protocol: CountProtocol::default(),
            view_mode: ViewMode::default(),
        }
    }

    /// Fetch the collection once
    ///
    /// A failed fetch is notified through the `Notifier`, leaves the collection
    /// empty and is reported as `LoadState::Failed`; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyLoaded` if called more than once.
    pub async fn load(&mut self) -> Result<LoadState> {
        if self.load_state != LoadState::Idle {
            return Err(SessionError::AlreadyLoaded);
        }
        self.load_state = LoadState::Loading;
        let profile = self.settings.profile;
        debug!(%profile, "fetching collection");

        let source = Arc::clone(&self.source);
        let token = self.token.clone();
        let fetched = tokio::select! {
            () = token.cancelled() => {
                debug!(%profile, "fetch cancelled");
                self.load_state = LoadState::Cancelled;
                return Ok(LoadState::Cancelled);
            }
            fetched = source.fetch_all() => fetched,
        };

        let collection = fetched.map(Collection::new).map_err(|e| e.to_string());

        match collection {
            Ok(collection) => {
                info!(%profile, items = collection.len(), "collection loaded");
                self.collection = collection;
                self.load_state = LoadState::Ready;
            }
            Err(reason) => {
                error!(%profile, error = %reason, "failed to load collection");
                self.notifier.notify(
                    NoticeKind::Error,
                    &format!("Could not load {profile}. Please try again later."),
                );
                self.collection = Collection::empty();
                self.load_state = LoadState::Failed(reason);
            }
        }
        self.refresh();
        Ok(self.load_state.clone())
    }

    /// Cancel in-flight work and close every surface
    pub fn unmount(&mut self) {
        debug!(profile = %self.settings.profile, "session unmounted");
        self.token.cancel();
        self.browser.close();
    }

    /// Token cancelled on unmount; hand child tokens to related tasks
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub const fn settings(&self) -> &PageSettings {
        &self.settings
    }

    #[must_use]
    pub const fn collection(&self) -> &Collection<S::Item> {
        &self.collection
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub const fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Current instant according to the session clock
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // Query surface

    /// Filtered and sorted items, in result order
    pub fn results(&self) -> impl Iterator<Item = &S::Item> {
        self.results.iter().filter_map(|&index| self.collection.get(index))
    }

    #[must_use]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.page().page
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page().page_count
    }

    #[must_use]
    pub fn current_page_items(&self) -> Vec<&S::Item> {
        self.page()
            .items
            .into_iter()
            .filter_map(|index| self.collection.get(index))
            .collect()
    }

    /// Page-number buttons around the current page
    #[must_use]
    pub fn page_window(&self, width: usize) -> Vec<usize> {
        let page = self.page();
        page_window(page.page, page.page_count, width)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        self.refresh();
    }

    /// Constrain one facet; "all" (or "todos") clears it
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownFacet` if the page does not expose `name`.
    pub fn set_facet(&mut self, name: &str, value: impl Into<FacetSelection>) -> Result<()> {
        self.settings.profile.check_facet(name)?;
        self.criteria.set_facet(name, value.into());
        self.refresh();
        Ok(())
    }

    /// Replace the whole criteria at once (one recompute, one page reset)
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownFacet` if a constrained facet is not exposed by
    /// the page; the current criteria are kept.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Result<()> {
        for (name, _) in criteria.active_facets() {
            self.settings.profile.check_facet(name)?;
        }
        self.criteria = criteria;
        self.refresh();
        Ok(())
    }

    pub fn set_tab(&mut self, tab: Option<StatusTab>) {
        self.criteria.tab = tab;
        self.refresh();
    }

    /// # Errors
    ///
    /// Returns `QueryError::UnsupportedSortKey` if the page does not offer `key`.
    pub fn set_sort_key(&mut self, key: SortKey) -> Result<()> {
        self.sort_key = self.settings.profile.check_sort_key(key)?;
        self.refresh();
        Ok(())
    }

    /// Move to `page` (clamped); returns the effective page
    pub fn set_page(&mut self, page: usize) -> usize {
        self.pagination.set_page(page, self.results.len());
        self.pagination.current_page()
    }

    /// Distinct values of a facet across the whole collection
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownFacet` if the page does not expose `name`.
    pub fn facet_values(&self, name: &str) -> Result<Vec<FacetCount>> {
        self.settings.profile.check_facet(name)?;
        Ok(QueryEngine::facet_values(&self.collection, name))
    }

    /// Status counts over the whole collection at the current instant
    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        status_counts(self.collection.iter(), self.now())
    }

    /// Serialize the filtered and sorted list
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Export` if the exporter fails.
    pub fn export(&self, exporter: &dyn Exporter) -> Result<Vec<u8>> {
        let now = self.clock.now();
        let rows: Vec<ExportRow> = self
            .results()
            .map(|item| ExportRow::from_record(item, now))
            .collect();
        Ok(exporter.export(&rows)?)
    }

    // View surface

    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view.mode()
    }

    pub const fn set_view_mode(&mut self, mode: ViewMode) {
        self.view.set_mode(mode);
    }

    pub const fn toggle_facet_panel(&mut self) -> bool {
        self.view.toggle_facet_panel()
    }

    #[must_use]
    pub const fn facet_panel_open(&self) -> bool {
        self.view.facet_panel_open()
    }

    // Media browser surface

    #[must_use]
    pub const fn browser(&self) -> &MediaBrowser<S::Item> {
        &self.browser
    }

    #[must_use]
    pub const fn browser_state(&self) -> BrowserState {
        self.browser.state()
    }

    /// Open the detail modal for `id` and register a view
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownItem` for ids outside the collection and
    /// `BrowseError::InvalidTransition` while the carousel or fullscreen is open.
    pub fn open_detail(&mut self, id: &ItemId) -> Result<()> {
        let item = self
            .collection
            .find(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownItem(id.clone()))?;
        self.browser.open_detail(item)?;
        self.counter.register(id.clone());
        Ok(())
    }

    /// Open the carousel over the media of the current result list
    ///
    /// `start_index` counts browsable entries only and is clamped.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::EmptyCarousel` if no result carries an image or video.
    pub fn open_carousel(&mut self, start_index: usize) -> Result<usize> {
        let media: Vec<Media> = self.results().filter_map(|item| item.media().cloned()).collect();
        Ok(self.browser.open_carousel(media, start_index)?)
    }

    /// Show the media of `id` fullscreen
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownItem` or `SessionError::NoMedia`.
    pub fn open_fullscreen(&mut self, id: &ItemId) -> Result<()> {
        let item = self
            .collection
            .find(id)
            .ok_or_else(|| SessionError::UnknownItem(id.clone()))?;
        let media = item.media().cloned().ok_or_else(|| SessionError::NoMedia(id.clone()))?;
        self.browser.open_fullscreen(media);
        Ok(())
    }

    pub fn close(&mut self) {
        self.browser.close();
    }

    pub fn next(&mut self) -> Option<usize> {
        self.browser.next()
    }

    pub fn prev(&mut self) -> Option<usize> {
        self.browser.prev()
    }

    pub fn jump_to(&mut self, index: usize) -> Option<usize> {
        self.browser.jump_to(index)
    }

    pub fn handle_key(&mut self, key: BrowserKey) -> KeyOutcome {
        self.browser.handle_key(key)
    }

    pub fn report_media_failure(&mut self, url: impl Into<String>) {
        self.browser.report_media_failure(url);
    }

    #[must_use]
    pub fn media_display(&self, media: &Media) -> MediaDisplay {
        self.browser.media_display(media)
    }

    // View counting

    /// Apply every view-count update received so far; returns how many were applied
    ///
    /// Each update patches the collection entry and, if it is shown, the detail
    /// selection. Updates for unknown ids are skipped.
    pub fn apply_view_updates(&mut self) -> usize {
        let mut applied = 0;
        for update in self.counter.drain() {
            let patched = self.collection.patch_view_count(&update.id, update.count);
            self.browser.patch_view_count(&update.id, update.count);
            if patched {
                debug!(item = %update.id, count = update.count, "view count applied");
                applied += 1;
            }
        }
        applied
    }

    /// Wait for one view-count update and apply it
    pub async fn next_view_update(&mut self) -> Option<ItemId> {
        tokio::select! {
            () = self.token.cancelled() => None,
            update = self.counter.next_update() => {
                let update = update?;
                self.collection.patch_view_count(&update.id, update.count);
                self.browser.patch_view_count(&update.id, update.count);
                Some(update.id)
            }
        }
    }

    fn page(&self) -> Page<usize> {
        self.pagination.page(&self.results)
    }

    fn refresh(&mut self) {
        self.results = QueryEngine::run(&self.collection, &self.criteria, self.sort_key, self.clock.now());
        self.pagination.reset();
    }
}

impl<S: ContentSource> Drop for PageSession<S> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
