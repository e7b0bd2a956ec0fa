//! Domain types for folio

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved id for drafts rendered before they are saved.
pub const PREVIEW_ID: &str = "preview";

// === Posts ===

/// Fields shared by every post variant.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBase {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// An image with optional pre-sized variants
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Thumbnails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

impl Image {
    /// Best URL for a card-sized slot: medium thumbnail, then small, then the original.
    pub fn card_url(&self) -> &str {
        self.thumbnails
            .as_ref()
            .and_then(|t| t.medium.as_deref().or(t.small.as_deref()))
            .unwrap_or(self.url.as_str())
    }

    /// Best URL for a full-width slot: large thumbnail, then the original.
    pub fn large_url(&self) -> &str {
        self.thumbnails
            .as_ref()
            .and_then(|t| t.large.as_deref())
            .unwrap_or(self.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(flatten)]
    pub base: PostBase,
    #[serde(default)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(flatten)]
    pub base: PostBase,
    pub image: Image,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    #[serde(flatten)]
    pub base: PostBase,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtStyle {
    #[default]
    Note,
    Quote,
    Idea,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    #[serde(flatten)]
    pub base: PostBase,
    #[serde(default)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ThoughtStyle>,
    /// Attribution for quotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Audio {
    pub url: String,
    pub title: String,
    pub artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Track {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Music {
    #[serde(flatten)]
    pub base: PostBase,
    pub audio: Audio,
    /// Present for albums
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(flatten)]
    pub base: PostBase,
    pub video: VideoSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(flatten)]
    pub base: PostBase,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(flatten)]
    pub base: PostBase,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(flatten)]
    pub base: PostBase,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub base: PostBase,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(flatten)]
    pub base: PostBase,
    /// The thing being recommended (a book, an album, a tool...)
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(flatten)]
    pub base: PostBase,
    pub subject: String,
    pub score: f32,
    #[serde(default = "default_max_score")]
    pub max_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

fn default_max_score() -> f32 {
    5.0
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingItem {
    /// 1-based; not required to be contiguous or unique
    pub rank: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    #[serde(flatten)]
    pub base: PostBase,
    #[serde(default)]
    pub items: Vec<RankingItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A post as served by the API, tagged by its `type` field.
///
/// Any `type` this build does not know deserializes to [`Post::Unsupported`]
/// instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Post {
    Article(Article),
    Photo(Photo),
    Gallery(Gallery),
    Thought(Thought),
    Music(Music),
    Video(Video),
    Project(Project),
    Link(Link),
    Announcement(Announcement),
    Event(Event),
    Recommendation(Recommendation),
    Rating(Rating),
    Ranking(Ranking),
    #[serde(other)]
    Unsupported,
}

impl Post {
    /// Shared fields, or `None` for an unsupported payload.
    pub fn base(&self) -> Option<&PostBase> {
        match self {
            Post::Article(p) => Some(&p.base),
            Post::Photo(p) => Some(&p.base),
            Post::Gallery(p) => Some(&p.base),
            Post::Thought(p) => Some(&p.base),
            Post::Music(p) => Some(&p.base),
            Post::Video(p) => Some(&p.base),
            Post::Project(p) => Some(&p.base),
            Post::Link(p) => Some(&p.base),
            Post::Announcement(p) => Some(&p.base),
            Post::Event(p) => Some(&p.base),
            Post::Recommendation(p) => Some(&p.base),
            Post::Rating(p) => Some(&p.base),
            Post::Ranking(p) => Some(&p.base),
            Post::Unsupported => None,
        }
    }

    pub fn base_mut(&mut self) -> Option<&mut PostBase> {
        match self {
            Post::Article(p) => Some(&mut p.base),
            Post::Photo(p) => Some(&mut p.base),
            Post::Gallery(p) => Some(&mut p.base),
            Post::Thought(p) => Some(&mut p.base),
            Post::Music(p) => Some(&mut p.base),
            Post::Video(p) => Some(&mut p.base),
            Post::Project(p) => Some(&mut p.base),
            Post::Link(p) => Some(&mut p.base),
            Post::Announcement(p) => Some(&mut p.base),
            Post::Event(p) => Some(&mut p.base),
            Post::Recommendation(p) => Some(&mut p.base),
            Post::Rating(p) => Some(&mut p.base),
            Post::Ranking(p) => Some(&mut p.base),
            Post::Unsupported => None,
        }
    }

    pub fn kind(&self) -> Option<PostKind> {
        let kind = match self {
            Post::Article(_) => PostKind::Article,
            Post::Photo(_) => PostKind::Photo,
            Post::Gallery(_) => PostKind::Gallery,
            Post::Thought(_) => PostKind::Thought,
            Post::Music(_) => PostKind::Music,
            Post::Video(_) => PostKind::Video,
            Post::Project(_) => PostKind::Project,
            Post::Link(_) => PostKind::Link,
            Post::Announcement(_) => PostKind::Announcement,
            Post::Event(_) => PostKind::Event,
            Post::Recommendation(_) => PostKind::Recommendation,
            Post::Rating(_) => PostKind::Rating,
            Post::Ranking(_) => PostKind::Ranking,
            Post::Unsupported => return None,
        };
        Some(kind)
    }

    pub fn id(&self) -> Option<&str> {
        self.base().map(|b| b.id.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.base().map(|b| b.title.as_str())
    }

    /// True for an unsaved draft rendered from the composer.
    pub fn is_preview(&self) -> bool {
        self.id() == Some(PREVIEW_ID)
    }
}

/// The `type` tag of a post, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Article,
    Photo,
    Gallery,
    Thought,
    Music,
    Video,
    Project,
    Link,
    Announcement,
    Event,
    Recommendation,
    Rating,
    Ranking,
}

impl PostKind {
    pub const ALL: [PostKind; 13] = [
        PostKind::Article,
        PostKind::Photo,
        PostKind::Gallery,
        PostKind::Thought,
        PostKind::Music,
        PostKind::Video,
        PostKind::Project,
        PostKind::Link,
        PostKind::Announcement,
        PostKind::Event,
        PostKind::Recommendation,
        PostKind::Rating,
        PostKind::Ranking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Article => "article",
            PostKind::Photo => "photo",
            PostKind::Gallery => "gallery",
            PostKind::Thought => "thought",
            PostKind::Music => "music",
            PostKind::Video => "video",
            PostKind::Project => "project",
            PostKind::Link => "link",
            PostKind::Announcement => "announcement",
            PostKind::Event => "event",
            PostKind::Recommendation => "recommendation",
            PostKind::Rating => "rating",
            PostKind::Ranking => "ranking",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        PostKind::ALL
            .into_iter()
            .find(|k| k.as_str() == needle)
            .ok_or_else(|| format!("unknown post type: {}", s))
    }
}

/// Parse a comma-joined type list such as `"photo,gallery"`.
pub fn parse_kinds(s: &str) -> std::result::Result<Vec<PostKind>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PostKind::from_str)
        .collect()
}

// === Feed items ===

/// Display hint for one feed slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySize {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

impl DisplaySize {
    pub const ALL: [DisplaySize; 4] = [
        DisplaySize::Small,
        DisplaySize::Medium,
        DisplaySize::Large,
        DisplaySize::Full,
    ];

    /// Large and full slots get the expanded layouts.
    pub fn is_expanded(&self) -> bool {
        matches!(self, DisplaySize::Large | DisplaySize::Full)
    }
}

impl FromStr for DisplaySize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(DisplaySize::Small),
            "medium" => Ok(DisplaySize::Medium),
            "large" => Ok(DisplaySize::Large),
            "full" => Ok(DisplaySize::Full),
            other => Err(format!("unknown display size: {}", other)),
        }
    }
}

/// A post paired with the size it should be shown at
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedItem {
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<DisplaySize>,
}

impl FeedItem {
    pub fn new(post: Post) -> Self {
        Self { post, size: None }
    }

    pub fn sized(post: Post, size: DisplaySize) -> Self {
        Self {
            post,
            size: Some(size),
        }
    }

    /// The requested size, defaulting to medium.
    pub fn size(&self) -> DisplaySize {
        self.size.unwrap_or_default()
    }
}

// === Queries ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "published" => Ok(PostStatus::Published),
            "draft" => Ok(PostStatus::Draft),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// The semantic part of a listing request. Page and limit belong to the pager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub kinds: Vec<PostKind>,
    pub status: Option<PostStatus>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
}

impl PostFilter {
    pub fn of_kinds(kinds: impl IntoIterator<Item = PostKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Trim string fields and drop blank ones so `Some("")` compares equal to `None`.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            kinds: self.kinds,
            status: self.status,
            category: clean(self.category),
            tag: clean(self.tag),
            q: clean(self.q),
        }
    }

    /// Comma-joined `type` parameter, `None` when unrestricted.
    pub fn type_param(&self) -> Option<String> {
        if self.kinds.is_empty() {
            return None;
        }
        let names: Vec<&str> = self.kinds.iter().map(PostKind::as_str).collect();
        Some(names.join(","))
    }

    pub fn to_query(&self, page: u32, limit: u32) -> PostsQuery {
        PostsQuery {
            kind: self.type_param(),
            status: self.status,
            category: self.category.clone(),
            tag: self.tag.clone(),
            q: self.q.clone(),
            page,
            limit,
        }
    }
}

/// Query string of `GET /posts`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostsQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    pub page: u32,
    pub limit: u32,
}

// === Responses ===

/// Envelope of `GET /posts`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_posts")]
    pub data: Vec<Post>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub has_more_pages: bool,
}

/// Decode each post on its own. A post that fails to decode becomes
/// [`Post::Unsupported`] and the rest of the page survives.
fn lenient_posts<'de, D>(deserializer: D) -> std::result::Result<Vec<Post>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("Rendering malformed post as unsupported: {}", e);
                Post::Unsupported
            })
        })
        .collect())
}

/// Envelope of single-resource endpoints
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

// === Profile ===

/// The "About Me" page
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<ProfileLink>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProfileLink {
    pub label: String,
    pub url: String,
}

impl Profile {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError {
                path: "name".to_string(),
                message: "Name is empty".to_string(),
            });
        }

        for (i, link) in self.links.iter().enumerate() {
            if link.label.trim().is_empty() {
                errors.push(ValidationError {
                    path: format!("links[{}].label", i),
                    message: "Link label is empty".to_string(),
                });
            }
            if !is_http_url(&link.url) {
                errors.push(ValidationError {
                    path: format!("links[{}].url", i),
                    message: format!("Not an http(s) URL: {}", link.url),
                });
            }
        }

        errors
    }
}

pub(crate) fn is_http_url(s: &str) -> bool {
    let s = s.trim();
    (s.starts_with("https://") && s.len() > "https://".len())
        || (s.starts_with("http://") && s.len() > "http://".len())
}

/// Content validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}
