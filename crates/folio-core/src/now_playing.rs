//! "Now playing" widget state fed by a push stream
//!
//! The upstream sends newline-delimited JSON: one track object per line, or
//! `null` when playback stops. Blank lines are keepalives. Lines may also
//! carry an SSE-style `data:` prefix.

use crate::error::{Error, Result};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);
const MAX_LINE_BYTES: usize = 64 * 1024;

/// The track currently playing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingTrack {
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_ms: Option<u64>,
    #[serde(default = "default_playing")]
    pub is_playing: bool,
}

fn default_playing() -> bool {
    true
}

/// A track plus the moment it arrived, for progress interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackUpdate {
    pub track: NowPlayingTrack,
    pub received_at: Instant,
}

impl TrackUpdate {
    pub fn progress_at(&self, now: Instant) -> Option<Duration> {
        interpolated_progress(&self.track, self.received_at, now)
    }
}

/// Playback position at `now`, given the position reported at `received_at`.
///
/// Advances with wall time while playing, holds still while paused and never
/// runs past the track's duration.
pub fn interpolated_progress(
    track: &NowPlayingTrack,
    received_at: Instant,
    now: Instant,
) -> Option<Duration> {
    let reported = Duration::from_millis(track.progress_ms?);
    let elapsed = if track.is_playing {
        now.saturating_duration_since(received_at)
    } else {
        Duration::ZERO
    };
    let progress = reported + elapsed;

    Some(match track.duration_ms {
        Some(total) => progress.min(Duration::from_millis(total)),
        None => progress,
    })
}

/// Shared latest-value cell that widgets subscribe to.
#[derive(Debug, Clone)]
pub struct NowPlaying {
    tx: Arc<watch::Sender<Option<TrackUpdate>>>,
}

impl Default for NowPlaying {
    fn default() -> Self {
        Self::new()
    }
}

impl NowPlaying {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn publish(&self, track: NowPlayingTrack) {
        tracing::debug!("Now playing: {} by {}", track.title, track.artist);
        self.tx.send_replace(Some(TrackUpdate {
            track,
            received_at: Instant::now(),
        }));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<TrackUpdate>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<TrackUpdate> {
        self.tx.borrow().clone()
    }
}

/// What one line of the stream asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    Track(NowPlayingTrack),
    Stopped,
}

/// Parse one stream line. `None` for keepalives and malformed lines.
pub fn parse_line(line: &[u8]) -> Option<LineEvent> {
    let text = std::str::from_utf8(line).ok()?.trim();
    let text = text.strip_prefix("data:").map(str::trim).unwrap_or(text);
    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<Option<NowPlayingTrack>>(text) {
        Ok(Some(track)) => Some(LineEvent::Track(track)),
        Ok(None) => Some(LineEvent::Stopped),
        Err(e) => {
            tracing::warn!("Skipping malformed now-playing line: {}", e);
            None
        }
    }
}

fn apply_line(line: &[u8], hub: &NowPlaying) -> bool {
    match parse_line(line) {
        Some(LineEvent::Track(track)) => hub.publish(track),
        Some(LineEvent::Stopped) => hub.clear(),
        None => return false,
    }
    true
}

/// Reassembles stream chunks into lines and applies them to a hub.
#[derive(Debug, Default)]
struct LineBuffer {
    buf: BytesMut,
    /// Leading bytes of `buf` already known to hold no newline
    scanned: usize,
    /// Dropping the tail of an oversized line
    skipping: bool,
}

impl LineBuffer {
    /// Append a chunk and apply every line it completes. Returns the number
    /// of events applied.
    fn push(&mut self, mut chunk: &[u8], hub: &NowPlaying) -> usize {
        if self.skipping {
            match chunk.iter().position(|b| *b == b'\n') {
                Some(pos) => {
                    chunk = &chunk[pos + 1..];
                    self.skipping = false;
                }
                None => return 0,
            }
        }
        self.buf.extend_from_slice(chunk);

        let mut applied = 0;
        while let Some(offset) = self.buf[self.scanned..].iter().position(|b| *b == b'\n') {
            let pos = self.scanned + offset;
            let line = self.buf.split_to(pos + 1);
            self.scanned = 0;
            if apply_line(&line[..pos], hub) {
                applied += 1;
            }
        }
        self.scanned = self.buf.len();

        if self.buf.len() > MAX_LINE_BYTES {
            tracing::warn!(
                "Discarding now-playing line longer than {} bytes",
                MAX_LINE_BYTES
            );
            self.buf.clear();
            self.scanned = 0;
            self.skipping = true;
        }
        applied
    }

    /// Apply a last line the server closed without terminating.
    fn finish(&mut self, hub: &NowPlaying) -> usize {
        if self.skipping || self.buf.is_empty() {
            return 0;
        }
        self.push(b"\n", hub)
    }
}

/// Client for the now-playing push stream
#[derive(Debug, Clone)]
pub struct NowPlayingFeed {
    http: reqwest::Client,
    url: String,
}

impl NowPlayingFeed {
    pub fn new(url: &str) -> Result<Self> {
        if !crate::types::is_http_url(url) {
            return Err(Error::Config(format!(
                "Now-playing URL must be http(s): {}",
                url
            )));
        }

        // No overall timeout: the response body is open-ended.
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Follow one connection until the server closes it or `cancel` fires.
    /// Returns the number of events applied to `hub`.
    pub async fn run(&self, hub: &NowPlaying, cancel: &CancellationToken) -> Result<usize> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/x-ndjson")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("Now-playing stream refused: {}", status),
            });
        }

        tracing::info!("Connected to now-playing stream at {}", self.url);
        let mut stream = response.bytes_stream();
        let mut lines = LineBuffer::default();
        let mut applied = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = stream.next() => next,
            };

            match next {
                Some(Ok(chunk)) => applied += lines.push(&chunk, hub),
                Some(Err(e)) => return Err(e.into()),
                None => {
                    applied += lines.finish(hub);
                    tracing::info!("Now-playing stream closed by server");
                    break;
                }
            }
        }

        Ok(applied)
    }

    /// Keep reconnecting with exponential backoff until cancelled.
    ///
    /// The hub is cleared whenever the connection drops so widgets never show
    /// a stale track.
    pub async fn follow(&self, hub: &NowPlaying, cancel: CancellationToken) {
        let mut backoff = Backoff::default();

        while !cancel.is_cancelled() {
            let applied = match self.run(hub, &cancel).await {
                Ok(0) => {
                    tracing::debug!("Now-playing stream closed without any events");
                    0
                }
                Ok(applied) => applied,
                Err(e) => {
                    tracing::warn!("Now-playing stream failed: {}", e);
                    0
                }
            };
            hub.clear();

            if cancel.is_cancelled() {
                break;
            }
            let delay = backoff.after_connection(applied);
            tracing::debug!("Reconnecting to now-playing stream in {:?}", delay);
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

/// Reconnect schedule. Doubles up to [`MAX_BACKOFF`] and starts over only
/// after a connection that delivered events.
#[derive(Debug)]
struct Backoff {
    next: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            next: INITIAL_BACKOFF,
        }
    }
}

impl Backoff {
    fn after_connection(&mut self, applied: usize) -> Duration {
        if applied > 0 {
            self.next = INITIAL_BACKOFF;
        }
        let delay = self.next;
        self.next = (self.next * 2).min(MAX_BACKOFF);
        delay
    }
}
