//! Integration tests for the now-playing stream client against a local server

use axum::{
    Router,
    body::Body,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use folio_core::{Error, NowPlaying, NowPlayingFeed};
use futures_util::stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(5);

/// Lets a test decide when a streaming response ends.
type Release = Arc<Notify>;

/// A body that sends a track split mid-object, a keepalive, a stop, and a
/// last track without a trailing newline.
async fn chunked_session() -> Response {
    let chunks: Vec<Result<Bytes, Infallible>> = vec![
        Ok(Bytes::from_static(b"{\"title\":\"Xtal\",\"art")),
        Ok(Bytes::from_static(b"ist\":\"Aphex Twin\",\"progressMs\":1000}\n")),
        Ok(Bytes::from_static(b"\n")),
        Ok(Bytes::from_static(b"null\n")),
        Ok(Bytes::from_static(b"not json\n")),
        Ok(Bytes::from_static(b"data: {\"title\":\"Flim\",\"artist\":\"Aphex Twin\"}")),
    ];
    Body::from_stream(stream::iter(chunks)).into_response()
}

/// One track, then the stream stays open until released.
async fn held_session(State(release): State<Release>) -> Response {
    let body = stream::unfold(true, move |first| {
        let release = Arc::clone(&release);
        async move {
            if first {
                let line = Bytes::from_static(b"{\"title\":\"Avril 14th\",\"artist\":\"Aphex Twin\"}\n");
                Some((Ok::<_, Infallible>(line), false))
            } else {
                release.notified().await;
                None
            }
        }
    });
    Body::from_stream(body).into_response()
}

async fn refused() -> Response {
    StatusCode::SERVICE_UNAVAILABLE.into_response()
}

/// Serve the stream endpoints on an ephemeral port and return the base URL.
async fn spawn_stream_server() -> (String, Release) {
    let release: Release = Arc::new(Notify::new());
    let app = Router::new()
        .route("/chunked", get(chunked_session))
        .route("/held", get(held_session))
        .route("/refused", get(refused))
        .with_state(Arc::clone(&release));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), release)
}

#[tokio::test]
async fn test_run_reassembles_lines_across_chunks() {
    let (base, _release) = spawn_stream_server().await;
    let feed = NowPlayingFeed::new(&format!("{}/chunked", base)).unwrap();
    let hub = NowPlaying::new();

    let applied = timeout(WAIT, feed.run(&hub, &CancellationToken::new()))
        .await
        .unwrap()
        .unwrap();

    // Xtal, the stop, and the unterminated Flim line
    assert_eq!(applied, 3);
    let current = hub.current().unwrap();
    assert_eq!(current.track.title, "Flim");
    assert!(current.track.is_playing);
}

#[tokio::test]
async fn test_run_returns_when_cancelled() {
    let (base, _release) = spawn_stream_server().await;
    let feed = NowPlayingFeed::new(&format!("{}/held", base)).unwrap();
    let hub = NowPlaying::new();
    let mut rx = hub.subscribe();
    let cancel = CancellationToken::new();

    let task = {
        let hub = hub.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { feed.run(&hub, &cancel).await })
    };

    timeout(WAIT, rx.wait_for(|update| update.is_some()))
        .await
        .unwrap()
        .unwrap();
    cancel.cancel();

    let applied = timeout(WAIT, task).await.unwrap().unwrap().unwrap();
    assert_eq!(applied, 1);
    // A single run leaves the last track in place
    assert_eq!(hub.current().unwrap().track.title, "Avril 14th");
}

#[tokio::test]
async fn test_follow_clears_on_disconnect_and_stops_on_cancel() {
    let (base, release) = spawn_stream_server().await;
    let feed = NowPlayingFeed::new(&format!("{}/held", base)).unwrap();
    let hub = NowPlaying::new();
    let mut rx = hub.subscribe();
    let cancel = CancellationToken::new();

    let task = {
        let hub = hub.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { feed.follow(&hub, cancel).await })
    };

    timeout(WAIT, rx.wait_for(|update| update.is_some()))
        .await
        .unwrap()
        .unwrap();

    // Server ends the stream; the widget must not keep showing the track
    release.notify_one();
    timeout(WAIT, rx.wait_for(|update| update.is_none()))
        .await
        .unwrap()
        .unwrap();

    cancel.cancel();
    timeout(WAIT, task).await.unwrap().unwrap();
    assert!(hub.current().is_none());
}

#[tokio::test]
async fn test_run_rejects_error_status() {
    let (base, _release) = spawn_stream_server().await;
    let feed = NowPlayingFeed::new(&format!("{}/refused", base)).unwrap();
    let hub = NowPlaying::new();

    let result = feed.run(&hub, &CancellationToken::new()).await;
    assert!(matches!(result, Err(Error::Api { status: 503, .. })));
    assert!(hub.current().is_none());
}
