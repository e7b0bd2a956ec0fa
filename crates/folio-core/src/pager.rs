//! Feed pagination and incremental-append cache
//!
//! [`FeedPager`] is the state machine: it decides when a page fetch may be
//! issued and how a response changes the accumulated list. It performs no
//! I/O. Each operation that needs the network hands back a [`PageRequest`]
//! ticket; the caller fetches it and feeds the outcome to
//! [`FeedPager::apply`]. Only the ticket currently in flight is ever applied,
//! so a response for a superseded filter (or one that arrives after a reset)
//! is dropped instead of corrupting the list.
//!
//! [`FeedHandle`] drives a pager against a [`PostSource`] and is what UI code
//! holds on to.

use crate::client::PostSource;
use crate::error::Result;
use crate::types::{DisplaySize, FeedItem, ListResponse, Post, PostFilter, PostsQuery};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Page size used when the config doesn't set one
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Upper bound on the page size requested from the API
pub const MAX_PAGE_SIZE: u32 = 100;

/// Error shown when the API reports failure without a message
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch posts";

/// A page fetch the pager has committed to. Hand it back to [`FeedPager::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    seq: u64,
    filter: PostFilter,
    page: u32,
    limit: u32,
    append: bool,
}

impl PageRequest {
    /// Wire query for this fetch: the filter plus page and limit.
    pub fn query(&self) -> PostsQuery {
        self.filter.to_query(self.page, self.limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_append(&self) -> bool {
        self.append
    }

    pub fn filter(&self) -> &PostFilter {
        &self.filter
    }
}

/// What [`FeedPager::apply`] did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Items were replaced or appended
    Applied,
    /// The fetch failed; `error` is set and items are untouched
    Failed,
    /// The request was superseded; nothing changed
    Stale,
}

/// Coarse view state for rendering the feed container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// No filter has been set yet
    Idle,
    /// First page in flight, nothing to show yet
    Loading,
    /// Nothing to show because the last fetch failed
    Failed(String),
    /// The listing succeeded and has no posts
    Empty,
    /// There are posts to show
    Ready,
}

/// Owned copy of the pager state
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub items: Vec<Post>,
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub has_more: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub status: FeedStatus,
}

impl FeedSnapshot {
    /// Wrap every post with the same display size, in feed order.
    pub fn feed_items(&self, size: DisplaySize) -> Vec<FeedItem> {
        self.items
            .iter()
            .cloned()
            .map(|post| FeedItem::sized(post, size))
            .collect()
    }
}

/// Pagination state for one filtered feed
#[derive(Debug)]
pub struct FeedPager {
    filter: Option<PostFilter>,
    items: Vec<Post>,
    pages_loaded: u32,
    limit: u32,
    total_items: u64,
    has_more: bool,
    loading: bool,
    error: Option<String>,
    next_seq: u64,
    in_flight: Option<u64>,
}

impl Default for FeedPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl FeedPager {
    /// Create an empty pager. `limit` is fixed for the pager's lifetime.
    pub fn new(limit: u32) -> Self {
        Self {
            filter: None,
            items: Vec::new(),
            pages_loaded: 0,
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            total_items: 0,
            has_more: true,
            loading: false,
            error: None,
            next_seq: 0,
            in_flight: None,
        }
    }

    /// Switch to a new filter.
    ///
    /// Clears the list and returns the first-page request. A filter that is
    /// semantically identical to the active one is a no-op.
    pub fn set_filter(&mut self, filter: PostFilter) -> Option<PageRequest> {
        let filter = filter.normalized();
        if self.filter.as_ref() == Some(&filter) {
            tracing::debug!("Filter unchanged, skipping fetch");
            return None;
        }

        self.clear();
        self.filter = Some(filter);
        Some(self.begin(1, false))
    }

    /// Request the next page, unless there is none or a fetch is already running.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.filter.is_none() || !self.has_more || self.loading {
            return None;
        }
        Some(self.begin(self.pages_loaded + 1, true))
    }

    /// Re-fetch the first page of the active filter from scratch.
    pub fn refresh(&mut self) -> Option<PageRequest> {
        self.filter.as_ref()?;
        self.clear();
        Some(self.begin(1, false))
    }

    /// Drop everything, including the filter, without fetching.
    ///
    /// Any request still in flight becomes stale.
    pub fn reset(&mut self) {
        self.clear();
        self.filter = None;
    }

    /// Apply the outcome of a fetch.
    pub fn apply(&mut self, request: &PageRequest, result: Result<ListResponse>) -> ApplyOutcome {
        if self.in_flight != Some(request.seq) {
            tracing::debug!(
                page = request.page,
                seq = request.seq,
                "Discarding response for superseded request"
            );
            return ApplyOutcome::Stale;
        }

        self.in_flight = None;
        self.loading = false;

        match result {
            Ok(response) if response.success => {
                let received = response.data.len();
                if request.append {
                    self.items.extend(response.data);
                } else {
                    self.items = response.data;
                }
                self.pages_loaded = request.page;
                self.total_items = response.total_items;
                self.has_more = response.has_more_pages;
                self.error = None;

                tracing::debug!(
                    page = request.page,
                    received,
                    total = self.total_items,
                    has_more = self.has_more,
                    "Applied page"
                );
                ApplyOutcome::Applied
            }
            Ok(response) => {
                let message = response
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| FETCH_FAILED_MESSAGE.to_string());
                tracing::warn!("Listing page {} failed: {}", request.page, message);
                self.error = Some(message);
                ApplyOutcome::Failed
            }
            Err(e) => {
                tracing::warn!("Listing page {} failed: {}", request.page, e);
                self.error = Some(e.to_string());
                ApplyOutcome::Failed
            }
        }
    }

    /// Give up on a request without a response (e.g. the view went away).
    pub fn abandon(&mut self, request: &PageRequest) {
        if self.in_flight == Some(request.seq) {
            self.in_flight = None;
            self.loading = false;
        }
    }

    pub fn items(&self) -> &[Post] {
        &self.items
    }

    /// Highest page fetched so far; 1 before anything has loaded.
    pub fn page(&self) -> u32 {
        self.pages_loaded.max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Trusted verbatim from the server's `hasMorePages`.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filter(&self) -> Option<&PostFilter> {
        self.filter.as_ref()
    }

    pub fn status(&self) -> FeedStatus {
        if self.filter.is_none() {
            return FeedStatus::Idle;
        }
        if !self.items.is_empty() {
            return FeedStatus::Ready;
        }
        if self.loading {
            return FeedStatus::Loading;
        }
        match &self.error {
            Some(message) => FeedStatus::Failed(message.clone()),
            None => FeedStatus::Empty,
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            items: self.items.clone(),
            page: self.page(),
            limit: self.limit,
            total_items: self.total_items,
            has_more: self.has_more,
            loading: self.loading,
            error: self.error.clone(),
            status: self.status(),
        }
    }

    fn clear(&mut self) {
        self.items.clear();
        self.pages_loaded = 0;
        self.total_items = 0;
        self.has_more = true;
        self.loading = false;
        self.error = None;
        self.in_flight = None;
    }

    fn begin(&mut self, page: u32, append: bool) -> PageRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);
        self.loading = true;
        self.error = None;

        PageRequest {
            seq,
            // begin() is only reached with a filter set
            filter: self.filter.clone().unwrap_or_default(),
            page,
            limit: self.limit,
            append,
        }
    }
}

/// A [`FeedPager`] bound to a [`PostSource`].
///
/// Cheap to clone; clones share the same feed. Operations never fail:
/// errors land in the snapshot's `error` field.
pub struct FeedHandle<S: ?Sized> {
    pager: Arc<Mutex<FeedPager>>,
    source: Arc<S>,
    cancel: CancellationToken,
}

impl<S: ?Sized> Clone for FeedHandle<S> {
    fn clone(&self) -> Self {
        Self {
            pager: Arc::clone(&self.pager),
            source: Arc::clone(&self.source),
            cancel: self.cancel.clone(),
        }
    }
}

impl<S: PostSource + ?Sized> FeedHandle<S> {
    pub fn new(source: Arc<S>, limit: u32) -> Self {
        Self {
            pager: Arc::new(Mutex::new(FeedPager::new(limit))),
            source,
            cancel: CancellationToken::new(),
        }
    }

    /// Switch filters and load the first page.
    ///
    /// Returns `None` when no fetch was needed.
    pub async fn set_filter(&self, filter: PostFilter) -> Option<ApplyOutcome> {
        if self.is_closed() {
            return None;
        }
        let request = self.pager.lock().await.set_filter(filter);
        self.execute(request).await
    }

    /// Load and append the next page, if allowed.
    pub async fn load_more(&self) -> Option<ApplyOutcome> {
        if self.is_closed() {
            return None;
        }
        let request = self.pager.lock().await.load_more();
        self.execute(request).await
    }

    pub async fn refresh(&self) -> Option<ApplyOutcome> {
        if self.is_closed() {
            return None;
        }
        let request = self.pager.lock().await.refresh();
        self.execute(request).await
    }

    pub async fn reset(&self) {
        self.pager.lock().await.reset();
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.pager.lock().await.snapshot()
    }

    /// Abort any in-flight fetch and refuse further ones.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn execute(&self, request: Option<PageRequest>) -> Option<ApplyOutcome> {
        let request = request?;
        let query = request.query();

        tracing::debug!(
            page = request.page,
            append = request.append,
            kind = query.kind.as_deref().unwrap_or("*"),
            "Fetching posts"
        );

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(page = request.page, "Feed closed, abandoning fetch");
                self.pager.lock().await.abandon(&request);
                return Some(ApplyOutcome::Stale);
            }
            result = self.source.list_posts(&query) => result,
        };

        Some(self.pager.lock().await.apply(&request, result))
    }
}
