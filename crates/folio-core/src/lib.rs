//! # folio-core
//!
//! Core library for folio - the front-end core of a personal blog and
//! portfolio backed by a REST posts API.
//!
//! This crate holds the feed and rendering logic without any terminal or UI
//! concerns. A front-end embeds it and draws the [`render::VisualBlock`]s it
//! produces.
//!
//! ## Features
//!
//! - **Feed Pager**: paginated, filterable post listing with incremental
//!   append and protection against out-of-order responses
//! - **Post Renderer**: maps each of the thirteen post types and a display
//!   size to a visual building block
//! - **Composer**: drafts, slugs, validation and live previews for admins
//! - **Now Playing**: latest-track hub fed by a push stream
//!
//! ## Quick Start
//!
//! ```ignore
//! use folio_core::{Folio, PostFilter, PostKind, resolve_config};
//! use folio_core::render::layout_tiles;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = resolve_config(None)?;
//!     let folio = Folio::from_config(config)?;
//!
//!     let feed = folio.feed();
//!     feed.set_filter(PostFilter::of_kinds([PostKind::Article])).await;
//!     feed.load_more().await;
//!
//!     let snapshot = feed.snapshot().await;
//!     for tile in layout_tiles(&snapshot.feed_items(folio.default_size())) {
//!         println!("{} ({} col)", tile.block.component(), tile.span.columns);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Display sizes
//!
//! - `small`, `medium` → compact cards, one grid column
//! - `large`, `full` → expanded blocks, two grid columns

mod client;
mod composer;
mod config;
mod error;
pub mod now_playing;
pub mod pager;
pub mod render;
mod types;

pub use client::{ApiClient, PostSource, Session};
pub use composer::{Draft, slugify};
pub use config::{
    ApiConfig, ApiToken, FeedConfig, FolioConfig, NowPlayingConfig, config_search_paths,
    resolve_config,
};
pub use error::{Error, Result};
pub use now_playing::{NowPlaying, NowPlayingFeed, NowPlayingTrack};
pub use pager::{FeedHandle, FeedPager, FeedSnapshot, FeedStatus};
pub use render::{VisualBlock, render, render_detail};
pub use types::*;

use std::sync::Arc;

/// Main entry point for a folio front-end
pub struct Folio {
    config: FolioConfig,
    client: Arc<ApiClient>,
}

impl Folio {
    /// Create a new instance from configuration
    pub fn from_config(config: FolioConfig) -> Result<Self> {
        let client = ApiClient::from_config(&config.api)?;
        tracing::debug!(
            "Using API at {} (admin: {})",
            client.base_url(),
            client.session().is_admin()
        );
        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn is_admin(&self) -> bool {
        self.client.session().is_admin()
    }

    /// Size used for feed items that don't carry one
    pub fn default_size(&self) -> DisplaySize {
        self.config.feed.default_size
    }

    /// A fresh feed bound to this API. Each mounted feed view gets its own.
    pub fn feed(&self) -> FeedHandle<ApiClient> {
        FeedHandle::new(Arc::clone(&self.client), self.config.feed.page_size())
    }

    /// Fetch one post and render its detail view.
    pub async fn post_detail(&self, id: &str) -> Result<(Post, VisualBlock)> {
        let post = self.client.fetch_post(id).await?;
        let block = render_detail(&post);
        Ok((post, block))
    }

    /// Publish a draft. With `id` the existing post is replaced.
    pub async fn publish(&self, draft: &Draft, id: Option<&str>) -> Result<Post> {
        match id {
            Some(id) => self.client.update_post(id, draft).await,
            None => self.client.create_post(draft).await,
        }
    }

    /// Stream client for the now-playing widget, if configured.
    pub fn now_playing_feed(&self) -> Option<Result<NowPlayingFeed>> {
        self.config
            .now_playing
            .as_ref()
            .map(|np| NowPlayingFeed::new(&np.url))
    }
}
