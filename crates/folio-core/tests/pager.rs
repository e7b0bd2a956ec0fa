//! Integration tests for the feed pager driven through FeedHandle

use folio_core::pager::{ApplyOutcome, FeedHandle};
use folio_core::{Error, FeedStatus, ListResponse, Post, PostFilter, PostKind, PostSource, PostsQuery, Result};
use futures_util::future::BoxFuture;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// In-memory post source with a fixed number of posts per type filter.
///
/// Fetches for a gated (type, page) pair wait until the gate is released;
/// pages marked as failing fail once.
struct ScriptedSource {
    total: u64,
    calls: AtomicUsize,
    queries: Mutex<Vec<PostsQuery>>,
    gates: Mutex<HashMap<(String, u32), Arc<Notify>>>,
    failing: Mutex<HashSet<u32>>,
}

impl ScriptedSource {
    fn new(total: u64) -> Arc<Self> {
        Arc::new(Self {
            total,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn queries(&self) -> Vec<PostsQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Hold fetches of `page` for `kind` ("*" for unfiltered) until released.
    fn gate(&self, kind: &str, page: u32) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert((kind.to_string(), page), Arc::clone(&notify));
        notify
    }

    fn fail_once(&self, page: u32) {
        self.failing.lock().unwrap().insert(page);
    }

    fn respond(&self, query: &PostsQuery) -> Result<ListResponse> {
        if self.failing.lock().unwrap().remove(&query.page) {
            return Err(Error::Http("connection reset".to_string()));
        }

        let kind = query.kind.clone().unwrap_or_else(|| "*".to_string());
        let start = u64::from(query.page - 1) * u64::from(query.limit);
        let end = (start + u64::from(query.limit)).min(self.total);
        let data = (start..end)
            .map(|n| thought(&format!("{}-{}", kind, n + 1)))
            .collect();

        Ok(ListResponse {
            success: true,
            message: None,
            data,
            total_items: self.total,
            has_more_pages: end < self.total,
        })
    }
}

impl PostSource for ScriptedSource {
    fn list_posts<'a>(&'a self, query: &'a PostsQuery) -> BoxFuture<'a, Result<ListResponse>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());

            let key = (
                query.kind.clone().unwrap_or_else(|| "*".to_string()),
                query.page,
            );
            let gate = self.gates.lock().unwrap().get(&key).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            self.respond(query)
        })
    }

    fn get_post<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Post>> {
        Box::pin(async move { Err(Error::NotFound(format!("/posts/{}", id))) })
    }
}

fn thought(id: &str) -> Post {
    serde_json::from_value(json!({
        "type": "thought",
        "id": id,
        "title": id,
        "createdAt": "2026-01-01T00:00:00Z",
        "content": "…"
    }))
    .unwrap()
}

fn ids(items: &[Post]) -> Vec<String> {
    items
        .iter()
        .filter_map(|p| p.id().map(String::from))
        .collect()
}

/// Wait until the source has seen `n` fetches.
async fn wait_for_calls(source: &ScriptedSource, n: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while source.calls() < n {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("source was not called in time");
}

// === Filter changes ===

#[tokio::test]
async fn test_late_response_for_old_filter_is_discarded() {
    let source = ScriptedSource::new(3);
    let photo_gate = source.gate("photo", 1);
    let feed = FeedHandle::new(Arc::clone(&source), 10);

    let slow = {
        let feed = feed.clone();
        tokio::spawn(async move {
            feed.set_filter(PostFilter::of_kinds([PostKind::Photo]))
                .await
        })
    };
    wait_for_calls(&source, 1).await;

    let outcome = feed
        .set_filter(PostFilter::of_kinds([PostKind::Music]))
        .await;
    assert_eq!(outcome, Some(ApplyOutcome::Applied));

    photo_gate.notify_one();
    assert_eq!(slow.await.unwrap(), Some(ApplyOutcome::Stale));

    let snapshot = feed.snapshot().await;
    assert_eq!(ids(&snapshot.items), vec!["music-1", "music-2", "music-3"]);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.status, FeedStatus::Ready);
}

#[tokio::test]
async fn test_identical_filter_does_not_refetch() {
    let source = ScriptedSource::new(2);
    let feed = FeedHandle::new(Arc::clone(&source), 10);

    feed.set_filter(PostFilter::of_kinds([PostKind::Article, PostKind::Link]))
        .await;
    let again = feed
        .set_filter(PostFilter::of_kinds([PostKind::Article, PostKind::Link]))
        .await;

    assert_eq!(again, None);
    assert_eq!(source.calls(), 1);
    assert_eq!(source.queries()[0].kind.as_deref(), Some("article,link"));

    // refresh bypasses the no-op
    assert_eq!(feed.refresh().await, Some(ApplyOutcome::Applied));
    assert_eq!(source.calls(), 2);
}

// === Appending ===

#[tokio::test]
async fn test_load_more_appends_pages_in_order() {
    let source = ScriptedSource::new(5);
    let feed = FeedHandle::new(Arc::clone(&source), 2);

    feed.set_filter(PostFilter::default()).await;
    let first_page = ids(&feed.snapshot().await.items);

    feed.load_more().await;
    let after_two = ids(&feed.snapshot().await.items);
    assert_eq!(&after_two[..first_page.len()], first_page.as_slice());

    feed.load_more().await;
    let snapshot = feed.snapshot().await;
    assert_eq!(ids(&snapshot.items), vec!["*-1", "*-2", "*-3", "*-4", "*-5"]);
    assert_eq!(snapshot.page, 3);
    assert_eq!(snapshot.total_items, 5);

    let pages: Vec<u32> = source.queries().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_load_more_stops_when_no_more_pages() {
    let source = ScriptedSource::new(4);
    let feed = FeedHandle::new(Arc::clone(&source), 2);

    feed.set_filter(PostFilter::default()).await;
    assert_eq!(feed.load_more().await, Some(ApplyOutcome::Applied));
    assert!(!feed.snapshot().await.has_more);

    assert_eq!(feed.load_more().await, None);
    assert_eq!(feed.load_more().await, None);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_load_more_is_single_flight() {
    let source = ScriptedSource::new(6);
    let gate = source.gate("*", 2);
    let feed = FeedHandle::new(Arc::clone(&source), 2);
    feed.set_filter(PostFilter::default()).await;

    let pending = {
        let feed = feed.clone();
        tokio::spawn(async move { feed.load_more().await })
    };
    wait_for_calls(&source, 2).await;
    assert!(feed.snapshot().await.loading);

    assert_eq!(feed.load_more().await, None);
    assert_eq!(feed.load_more().await, None);
    assert_eq!(source.calls(), 2);

    gate.notify_one();
    assert_eq!(pending.await.unwrap(), Some(ApplyOutcome::Applied));
    assert_eq!(feed.snapshot().await.items.len(), 4);
}

#[tokio::test]
async fn test_failed_page_is_retried() {
    let source = ScriptedSource::new(4);
    let feed = FeedHandle::new(Arc::clone(&source), 2);
    feed.set_filter(PostFilter::default()).await;

    source.fail_once(2);
    assert_eq!(feed.load_more().await, Some(ApplyOutcome::Failed));

    let snapshot = feed.snapshot().await;
    assert_eq!(ids(&snapshot.items), vec!["*-1", "*-2"]);
    assert_eq!(snapshot.error.as_deref(), Some("Request failed: connection reset"));
    assert!(!snapshot.loading);

    assert_eq!(feed.load_more().await, Some(ApplyOutcome::Applied));
    let snapshot = feed.snapshot().await;
    assert_eq!(ids(&snapshot.items), vec!["*-1", "*-2", "*-3", "*-4"]);
    assert!(snapshot.error.is_none());

    let pages: Vec<u32> = source.queries().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 2, 2]);
}

#[tokio::test]
async fn test_failed_first_page_shows_error_status() {
    let source = ScriptedSource::new(4);
    source.fail_once(1);
    let feed = FeedHandle::new(Arc::clone(&source), 2);

    assert_eq!(
        feed.set_filter(PostFilter::default()).await,
        Some(ApplyOutcome::Failed)
    );
    assert_eq!(
        feed.snapshot().await.status,
        FeedStatus::Failed("Request failed: connection reset".to_string())
    );
}

// === Teardown ===

#[tokio::test]
async fn test_close_abandons_in_flight_fetch() {
    let source = ScriptedSource::new(4);
    let _gate = source.gate("*", 1);
    let feed = FeedHandle::new(Arc::clone(&source), 2);

    let pending = {
        let feed = feed.clone();
        tokio::spawn(async move { feed.set_filter(PostFilter::default()).await })
    };
    wait_for_calls(&source, 1).await;

    feed.close();
    assert_eq!(pending.await.unwrap(), Some(ApplyOutcome::Stale));

    let snapshot = feed.snapshot().await;
    assert!(!snapshot.loading);
    assert!(snapshot.items.is_empty());

    assert!(feed.is_closed());
    assert_eq!(feed.load_more().await, None);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_reset_orphans_in_flight_fetch() {
    let source = ScriptedSource::new(4);
    let gate = source.gate("*", 1);
    let feed = FeedHandle::new(Arc::clone(&source), 2);

    let pending = {
        let feed = feed.clone();
        tokio::spawn(async move { feed.set_filter(PostFilter::default()).await })
    };
    wait_for_calls(&source, 1).await;

    feed.reset().await;
    gate.notify_one();
    assert_eq!(pending.await.unwrap(), Some(ApplyOutcome::Stale));

    let snapshot = feed.snapshot().await;
    assert_eq!(snapshot.status, FeedStatus::Idle);
    assert!(snapshot.items.is_empty());
}
