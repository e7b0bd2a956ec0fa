//! Post rendering dispatch
//!
//! Maps a [`FeedItem`] to a [`VisualBlock`]: which presentational component
//! to use and the props to feed it. Dispatch is a pure function of the post
//! and the requested [`DisplaySize`]; it never fails. Missing optional fields
//! degrade to empty strings or absent badges, and payloads of an unknown
//! `type` render a neutral fallback block.
//!
//! Grid placement is decided separately by [`GridSpan::for_size`], which only
//! looks at the size hint.

use crate::types::*;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Message shown for payloads this build cannot render.
pub const UNSUPPORTED_MESSAGE: &str = "Unsupported post type";

const COMPACT_EXCERPT_CHARS: usize = 140;
const CONTENT_EXCERPT_CHARS: usize = 280;

// === Output types ===

/// A layout choice plus the props that parametrize it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", content = "props", rename_all = "snake_case")]
pub enum VisualBlock {
    Hero(HeroProps),
    Content(ContentProps),
    CompactArticle(CompactArticleProps),
    LargePhoto(PhotoProps),
    PhotoCard(PhotoProps),
    GalleryGrid(GalleryProps),
    Quote(QuoteProps),
    Note(NoteProps),
    MediaRow(MediaRowProps),
    LinkCard(LinkCardProps),
    ImageOverlay(ImageOverlayProps),
    RecommendationCard(RecommendationProps),
    RatingCard(RatingProps),
    RankingList(RankingProps),
    Fallback(FallbackProps),
}

impl VisualBlock {
    /// Component name, matching the serialized `component` tag.
    pub fn component(&self) -> &'static str {
        match self {
            VisualBlock::Hero(_) => "hero",
            VisualBlock::Content(_) => "content",
            VisualBlock::CompactArticle(_) => "compact_article",
            VisualBlock::LargePhoto(_) => "large_photo",
            VisualBlock::PhotoCard(_) => "photo_card",
            VisualBlock::GalleryGrid(_) => "gallery_grid",
            VisualBlock::Quote(_) => "quote",
            VisualBlock::Note(_) => "note",
            VisualBlock::MediaRow(_) => "media_row",
            VisualBlock::LinkCard(_) => "link_card",
            VisualBlock::ImageOverlay(_) => "image_overlay",
            VisualBlock::RecommendationCard(_) => "recommendation_card",
            VisualBlock::RatingCard(_) => "rating_card",
            VisualBlock::RankingList(_) => "ranking_list",
            VisualBlock::Fallback(_) => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cta {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroProps {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub badge: Option<String>,
    pub cta: Option<Cta>,
    pub href: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentProps {
    pub title: String,
    pub body: String,
    pub image_url: String,
    pub meta: Option<String>,
    pub href: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactArticleProps {
    pub title: String,
    pub excerpt: String,
    pub image_url: String,
    pub date: String,
    pub reading_time: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoProps {
    pub title: String,
    pub image_url: String,
    pub alt: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryProps {
    pub title: String,
    pub description: Option<String>,
    pub images: Vec<GalleryImage>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteProps {
    pub text: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteProps {
    pub text: String,
    pub date: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRow {
    pub number: usize,
    pub title: String,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRowProps {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub cover_url: String,
    pub audio_url: String,
    pub duration: Option<String>,
    pub tracks: Vec<TrackRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCardProps {
    pub title: String,
    pub url: String,
    pub domain: String,
    pub description: Option<String>,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOverlayProps {
    pub title: String,
    pub image_url: String,
    pub badge: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationProps {
    pub title: String,
    pub subject: String,
    pub medium: Option<String>,
    pub reason: String,
    pub image_url: String,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingProps {
    pub title: String,
    pub subject: String,
    pub score: f32,
    pub max_score: f32,
    pub stars: String,
    pub review: Option<String>,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingProps {
    pub title: String,
    pub description: Option<String>,
    pub entries: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackProps {
    pub message: String,
}

/// Number of grid columns a tile occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSpan {
    pub columns: u8,
}

impl GridSpan {
    pub const SINGLE: GridSpan = GridSpan { columns: 1 };
    pub const DOUBLE: GridSpan = GridSpan { columns: 2 };

    /// Large and full slots span two columns; everything else, including no hint, spans one.
    pub fn for_size(size: Option<DisplaySize>) -> Self {
        match size {
            Some(DisplaySize::Large | DisplaySize::Full) => Self::DOUBLE,
            Some(DisplaySize::Small | DisplaySize::Medium) | None => Self::SINGLE,
        }
    }
}

/// One rendered grid cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub span: GridSpan,
    pub block: VisualBlock,
}

// === Dispatch ===

/// Render one feed item.
pub fn render(item: &FeedItem) -> VisualBlock {
    dispatch(&item.post, item.size())
}

/// Render a post on its own detail page.
pub fn render_detail(post: &Post) -> VisualBlock {
    dispatch(post, DisplaySize::Full)
}

/// Render every item of a feed with its grid placement, preserving order.
pub fn layout_tiles(items: &[FeedItem]) -> Vec<Tile> {
    items
        .iter()
        .map(|item| Tile {
            span: GridSpan::for_size(item.size),
            block: render(item),
        })
        .collect()
}

fn dispatch(post: &Post, size: DisplaySize) -> VisualBlock {
    match post {
        Post::Article(article) => render_article(article, size),
        Post::Photo(photo) => render_photo(photo, size),
        Post::Gallery(gallery) => render_gallery(gallery),
        Post::Thought(thought) => render_thought(thought),
        Post::Music(music) => render_music(music),
        Post::Video(video) => render_video(video, size),
        Post::Project(project) => render_project(project, size),
        Post::Link(link) => render_link(link),
        Post::Announcement(announcement) => render_announcement(announcement),
        Post::Event(event) => render_event(event, size),
        Post::Recommendation(rec) => render_recommendation(rec),
        Post::Rating(rating) => render_rating(rating),
        Post::Ranking(ranking) => render_ranking(ranking),
        Post::Unsupported => {
            tracing::debug!("Rendering fallback block for unsupported post payload");
            VisualBlock::Fallback(FallbackProps {
                message: UNSUPPORTED_MESSAGE.to_string(),
            })
        }
    }
}

fn render_article(article: &Article, size: DisplaySize) -> VisualBlock {
    let base = &article.base;
    let image_url = article.cover_image.clone().unwrap_or_default();

    if !size.is_expanded() {
        return VisualBlock::CompactArticle(CompactArticleProps {
            title: base.title.clone(),
            excerpt: article
                .excerpt
                .clone()
                .unwrap_or_else(|| summarize(&article.content, COMPACT_EXCERPT_CHARS)),
            image_url,
            date: format_date(&base.created_at),
            reading_time: article.reading_time.map(|m| format!("{} min read", m)),
            href: detail_href(base),
        });
    }

    if base.featured {
        VisualBlock::Hero(HeroProps {
            title: base.title.clone(),
            subtitle: article.excerpt.clone(),
            image_url,
            badge: base.category.clone(),
            cta: detail_href(base).map(|href| Cta {
                label: "Read More".to_string(),
                href,
            }),
            href: detail_href(base),
            tags: base.tags.clone(),
        })
    } else {
        VisualBlock::Content(ContentProps {
            title: base.title.clone(),
            body: article
                .excerpt
                .clone()
                .unwrap_or_else(|| summarize(&article.content, CONTENT_EXCERPT_CHARS)),
            image_url,
            meta: Some(byline(base, article.reading_time)),
            href: detail_href(base),
            tags: base.tags.clone(),
        })
    }
}

fn render_photo(photo: &Photo, size: DisplaySize) -> VisualBlock {
    let image_url = if size.is_expanded() {
        photo.image.large_url()
    } else {
        photo.image.card_url()
    };

    let props = PhotoProps {
        title: photo.base.title.clone(),
        image_url: image_url.to_string(),
        alt: photo.image.alt.clone(),
        caption: photo.caption.clone(),
        location: photo.location.clone(),
        href: detail_href(&photo.base),
    };

    if size.is_expanded() {
        VisualBlock::LargePhoto(props)
    } else {
        VisualBlock::PhotoCard(props)
    }
}

fn render_gallery(gallery: &Gallery) -> VisualBlock {
    VisualBlock::GalleryGrid(GalleryProps {
        title: gallery.base.title.clone(),
        description: gallery.description.clone(),
        images: gallery
            .images
            .iter()
            .map(|img| GalleryImage {
                url: img.card_url().to_string(),
                alt: img.alt.clone(),
            })
            .collect(),
        href: detail_href(&gallery.base),
    })
}

fn render_thought(thought: &Thought) -> VisualBlock {
    let is_quote = thought.style == Some(ThoughtStyle::Quote) || thought.source.is_some();

    if is_quote {
        VisualBlock::Quote(QuoteProps {
            text: thought.content.clone(),
            source: thought.source.clone(),
        })
    } else {
        VisualBlock::Note(NoteProps {
            text: thought.content.clone(),
            date: format_date(&thought.base.created_at),
            tags: thought.base.tags.clone(),
        })
    }
}

fn render_music(music: &Music) -> VisualBlock {
    let audio = &music.audio;
    let tracks = music
        .tracks
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, track)| TrackRow {
            number: i + 1,
            title: track.title.clone(),
            duration: track.duration.map(format_duration),
        })
        .collect();

    VisualBlock::MediaRow(MediaRowProps {
        title: audio.title.clone(),
        artist: audio.artist.clone(),
        album: audio.album.clone(),
        cover_url: audio.cover_url.clone().unwrap_or_default(),
        audio_url: audio.url.clone(),
        duration: audio.duration.map(format_duration),
        tracks,
    })
}

fn render_video(video: &Video, size: DisplaySize) -> VisualBlock {
    let base = &video.base;
    let thumbnail = video.video.thumbnail.clone().unwrap_or_default();

    if size.is_expanded() {
        let watch_href = video
            .video
            .embed_url
            .clone()
            .unwrap_or_else(|| video.video.url.clone());

        VisualBlock::Hero(HeroProps {
            title: base.title.clone(),
            subtitle: video.description.clone(),
            image_url: thumbnail,
            badge: video.video.platform.clone(),
            cta: Some(Cta {
                label: "Watch".to_string(),
                href: watch_href.clone(),
            }),
            href: Some(watch_href),
            tags: base.tags.clone(),
        })
    } else {
        VisualBlock::ImageOverlay(ImageOverlayProps {
            title: base.title.clone(),
            image_url: thumbnail,
            badge: video.video.duration.map(format_duration),
            href: detail_href(base),
        })
    }
}

fn render_project(project: &Project, size: DisplaySize) -> VisualBlock {
    let base = &project.base;
    let image_url = project.cover_image.clone().unwrap_or_default();

    if size == DisplaySize::Full {
        let href = project
            .project_url
            .clone()
            .or_else(|| project.repo_url.clone())
            .or_else(|| detail_href(base))
            .unwrap_or_else(|| "#".to_string());

        return VisualBlock::Hero(HeroProps {
            title: base.title.clone(),
            subtitle: non_empty(&project.description),
            image_url,
            badge: base.category.clone(),
            cta: Some(Cta {
                label: "View Project".to_string(),
                href,
            }),
            href: detail_href(base),
            tags: project.technologies.clone(),
        });
    }

    VisualBlock::Content(ContentProps {
        title: base.title.clone(),
        body: summarize(&project.description, CONTENT_EXCERPT_CHARS),
        image_url,
        meta: (!project.technologies.is_empty()).then(|| project.technologies.join(" · ")),
        href: detail_href(base),
        tags: base.tags.clone(),
    })
}

fn render_link(link: &Link) -> VisualBlock {
    VisualBlock::LinkCard(LinkCardProps {
        title: link.base.title.clone(),
        url: link.url.clone(),
        domain: link
            .site_name
            .clone()
            .unwrap_or_else(|| domain_of(&link.url)),
        description: link.description.clone(),
        image_url: link.preview_image.clone().unwrap_or_default(),
    })
}

fn render_announcement(announcement: &Announcement) -> VisualBlock {
    let base = &announcement.base;
    let badge = match announcement.priority {
        Priority::Urgent => "Urgent",
        Priority::Low | Priority::Normal | Priority::High => "Announcement",
    };

    VisualBlock::Hero(HeroProps {
        title: base.title.clone(),
        subtitle: non_empty(&announcement.content),
        image_url: announcement.cover_image.clone().unwrap_or_default(),
        badge: Some(badge.to_string()),
        cta: None,
        href: detail_href(base),
        tags: base.tags.clone(),
    })
}

fn render_event(event: &Event, size: DisplaySize) -> VisualBlock {
    let base = &event.base;
    let image_url = event.cover_image.clone().unwrap_or_default();

    if size == DisplaySize::Full {
        return VisualBlock::Hero(HeroProps {
            title: base.title.clone(),
            subtitle: event.location.clone(),
            image_url,
            badge: Some(format_date(&event.start_date)),
            cta: event.event_url.clone().map(|href| Cta {
                label: "Event Details".to_string(),
                href,
            }),
            href: detail_href(base),
            tags: base.tags.clone(),
        });
    }

    let mut meta = format_date(&event.start_date);
    if let Some(end) = &event.end_date
        && end.date_naive() != event.start_date.date_naive()
    {
        meta = format!("{} – {}", meta, format_date(end));
    }
    if let Some(location) = &event.location {
        meta = format!("{} · {}", meta, location);
    }

    VisualBlock::Content(ContentProps {
        title: base.title.clone(),
        body: event
            .description
            .as_deref()
            .map(|d| summarize(d, CONTENT_EXCERPT_CHARS))
            .unwrap_or_default(),
        image_url,
        meta: Some(meta),
        href: detail_href(base),
        tags: base.tags.clone(),
    })
}

fn render_recommendation(rec: &Recommendation) -> VisualBlock {
    VisualBlock::RecommendationCard(RecommendationProps {
        title: rec.base.title.clone(),
        subject: rec.subject.clone(),
        medium: rec.medium.clone(),
        reason: rec.reason.clone(),
        image_url: rec.cover_image.clone().unwrap_or_default(),
        href: rec.url.clone().or_else(|| detail_href(&rec.base)),
    })
}

const DEFAULT_MAX_SCORE: f32 = 5.0;
const MAX_STAR_SLOTS: usize = 10;

fn render_rating(rating: &Rating) -> VisualBlock {
    let max_score = if rating.max_score.is_finite() && rating.max_score > 0.0 {
        rating.max_score
    } else {
        DEFAULT_MAX_SCORE
    };
    let score = if rating.score.is_nan() {
        0.0
    } else {
        rating.score.clamp(0.0, max_score)
    };

    VisualBlock::RatingCard(RatingProps {
        title: rating.base.title.clone(),
        subject: rating.subject.clone(),
        score,
        max_score,
        stars: stars(score, max_score),
        review: rating.review.clone(),
        image_url: rating.cover_image.clone().unwrap_or_default(),
    })
}

fn render_ranking(ranking: &Ranking) -> VisualBlock {
    let mut entries: Vec<RankingEntry> = ranking
        .items
        .iter()
        .map(|item| RankingEntry {
            rank: item.rank,
            title: item.title.clone(),
            description: item.description.clone(),
            image_url: item.image.clone().unwrap_or_default(),
        })
        .collect();
    // Stable: ties keep server order
    entries.sort_by_key(|e| e.rank);

    VisualBlock::RankingList(RankingProps {
        title: ranking.base.title.clone(),
        description: ranking.description.clone(),
        entries,
    })
}

// === Helpers ===

/// Link to the post's detail page; drafts under preview have none.
fn detail_href(base: &PostBase) -> Option<String> {
    if base.id == PREVIEW_ID || base.id.is_empty() {
        return None;
    }
    Some(format!("/posts/{}", base.id))
}

fn byline(base: &PostBase, reading_time: Option<u32>) -> String {
    let mut parts = Vec::new();
    if let Some(author) = &base.author {
        parts.push(author.name.clone());
    }
    parts.push(format_date(&base.created_at));
    if let Some(minutes) = reading_time {
        parts.push(format!("{} min read", minutes));
    }
    parts.join(" · ")
}

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `m:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(seconds: u32) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

fn summarize(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn domain_of(url: &str) -> String {
    let rest = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url);
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// One star per point for scales up to ten. Wider scales are drawn out of five.
fn stars(score: f32, max_score: f32) -> String {
    let slots = match max_score.round() {
        n if (1.0..=MAX_STAR_SLOTS as f32).contains(&n) => n as usize,
        _ => DEFAULT_MAX_SCORE as usize,
    };
    let filled = (score / max_score * slots as f32).round() as usize;
    let filled = filled.min(slots);
    format!("{}{}", "★".repeat(filled), "☆".repeat(slots - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base(id: &str) -> PostBase {
        PostBase {
            id: id.to_string(),
            slug: "post".to_string(),
            title: "Post".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
            updated_at: None,
            tags: vec!["rust".to_string()],
            category: None,
            featured: false,
            draft: false,
            author: None,
        }
    }

    fn article(featured: bool) -> Post {
        let mut base = base("a1");
        base.featured = featured;
        Post::Article(Article {
            base,
            content: "Body".to_string(),
            excerpt: Some("Excerpt".to_string()),
            cover_image: None,
            reading_time: Some(4),
        })
    }

    #[test]
    fn test_article_featured_hero_links_to_detail() {
        let block = render(&FeedItem::sized(article(true), DisplaySize::Large));
        let VisualBlock::Hero(hero) = block else {
            panic!("expected hero, got {:?}", block);
        };
        assert_eq!(hero.image_url, "");
        assert_eq!(hero.href.as_deref(), Some("/posts/a1"));
        assert_eq!(hero.cta.map(|c| c.label), Some("Read More".to_string()));
    }

    #[test]
    fn test_article_compact_uses_reading_time() {
        let block = render(&FeedItem::new(article(true)));
        let VisualBlock::CompactArticle(card) = block else {
            panic!("expected compact article, got {:?}", block);
        };
        assert_eq!(card.date, "Mar 14, 2025");
        assert_eq!(card.reading_time.as_deref(), Some("4 min read"));
        assert_eq!(card.excerpt, "Excerpt");
    }

    #[test]
    fn test_photo_size_picks_thumbnail() {
        let post = Post::Photo(Photo {
            base: base("p1"),
            image: Image {
                url: "orig.jpg".to_string(),
                alt: "alt".to_string(),
                thumbnails: Some(Thumbnails {
                    small: Some("s.jpg".to_string()),
                    medium: None,
                    large: Some("l.jpg".to_string()),
                }),
            },
            caption: None,
            location: None,
        });

        match render(&FeedItem::sized(post.clone(), DisplaySize::Full)) {
            VisualBlock::LargePhoto(p) => assert_eq!(p.image_url, "l.jpg"),
            other => panic!("expected large photo, got {:?}", other),
        }
        match render(&FeedItem::sized(post, DisplaySize::Small)) {
            VisualBlock::PhotoCard(p) => assert_eq!(p.image_url, "s.jpg"),
            other => panic!("expected photo card, got {:?}", other),
        }
    }

    #[test]
    fn test_thought_with_source_is_quote() {
        let post = Post::Thought(Thought {
            base: base("t1"),
            content: "Simple is hard".to_string(),
            style: Some(ThoughtStyle::Note),
            source: Some("Someone".to_string()),
        });
        assert!(matches!(render_detail(&post), VisualBlock::Quote(_)));
    }

    #[test]
    fn test_announcement_badges() {
        let mut announcement = Announcement {
            base: base("n1"),
            content: String::new(),
            priority: Priority::Urgent,
            cover_image: None,
            expires_at: None,
        };

        let badge_for = |a: &Announcement, size| match render(&FeedItem::sized(
            Post::Announcement(a.clone()),
            size,
        )) {
            VisualBlock::Hero(h) => h.badge,
            other => panic!("expected hero, got {:?}", other),
        };

        assert_eq!(
            badge_for(&announcement, DisplaySize::Small).as_deref(),
            Some("Urgent")
        );
        announcement.priority = Priority::High;
        assert_eq!(
            badge_for(&announcement, DisplaySize::Full).as_deref(),
            Some("Announcement")
        );
    }

    #[test]
    fn test_project_hero_only_at_full() {
        let post = Post::Project(Project {
            base: base("pr1"),
            description: "A tool".to_string(),
            cover_image: None,
            project_url: Some("https://tool.dev".to_string()),
            repo_url: None,
            technologies: vec!["rust".to_string(), "tokio".to_string()],
        });

        match render(&FeedItem::sized(post.clone(), DisplaySize::Full)) {
            VisualBlock::Hero(h) => {
                let cta = h.cta.unwrap();
                assert_eq!(cta.label, "View Project");
                assert_eq!(cta.href, "https://tool.dev");
            }
            other => panic!("expected hero, got {:?}", other),
        }
        match render(&FeedItem::sized(post, DisplaySize::Large)) {
            VisualBlock::Content(c) => assert_eq!(c.meta.as_deref(), Some("rust · tokio")),
            other => panic!("expected content, got {:?}", other),
        }
    }

    #[test]
    fn test_event_full_hero_has_date_badge() {
        let post = Post::Event(Event {
            base: base("e1"),
            start_date: Utc.with_ymd_and_hms(2026, 6, 5, 18, 0, 0).unwrap(),
            end_date: Some(Utc.with_ymd_and_hms(2026, 6, 7, 18, 0, 0).unwrap()),
            location: Some("Lisbon".to_string()),
            description: None,
            cover_image: None,
            event_url: None,
        });

        match render(&FeedItem::sized(post.clone(), DisplaySize::Full)) {
            VisualBlock::Hero(h) => assert_eq!(h.badge.as_deref(), Some("Jun 5, 2026")),
            other => panic!("expected hero, got {:?}", other),
        }
        match render(&FeedItem::new(post)) {
            VisualBlock::Content(c) => {
                assert_eq!(
                    c.meta.as_deref(),
                    Some("Jun 5, 2026 – Jun 7, 2026 · Lisbon")
                );
                assert_eq!(c.body, "");
            }
            other => panic!("expected content, got {:?}", other),
        }
    }

    #[test]
    fn test_ranking_sorted_by_rank_stable() {
        let item = |rank, title: &str| RankingItem {
            rank,
            title: title.to_string(),
            description: None,
            image: None,
        };
        let post = Post::Ranking(Ranking {
            base: base("r1"),
            items: vec![item(3, "c"), item(1, "a"), item(3, "d"), item(2, "b")],
            description: None,
        });

        let VisualBlock::RankingList(list) = render(&FeedItem::new(post)) else {
            panic!("expected ranking list");
        };
        let titles: Vec<&str> = list.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_rating_stars() {
        assert_eq!(stars(4.0, 5.0), "★★★★☆");
        assert_eq!(stars(7.0, 10.0), "★★★★★★★☆☆☆");
        assert_eq!(stars(0.0, 5.0), "☆☆☆☆☆");
        assert_eq!(stars(50.0, 100.0), "★★★☆☆");
        assert_eq!(stars(4.0, 1e30), "☆☆☆☆☆");
    }

    #[test]
    fn test_preview_posts_have_no_detail_link() {
        let mut post = article(false);
        if let Some(base) = post.base_mut() {
            base.id = PREVIEW_ID.to_string();
        }
        match render(&FeedItem::sized(post, DisplaySize::Full)) {
            VisualBlock::Content(c) => assert!(c.href.is_none()),
            other => panic!("expected content, got {:?}", other),
        }
    }

    #[test]
    fn test_link_domain_fallback() {
        assert_eq!(domain_of("https://www.example.com/a?b=c"), "example.com");
        assert_eq!(domain_of("example.org/path"), "example.org");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(215), "3:35");
        assert_eq!(format_duration(3725), "1:02:05");
    }

    #[test]
    fn test_summarize_truncates_on_char_boundary() {
        assert_eq!(summarize("héllo wörld", 5), "héllo…");
        assert_eq!(summarize("  short  ", 10), "short");
    }

    #[test]
    fn test_block_serializes_component_and_props() {
        let block = VisualBlock::Fallback(FallbackProps {
            message: UNSUPPORTED_MESSAGE.to_string(),
        });
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["component"], "fallback");
        assert_eq!(json["props"]["message"], "Unsupported post type");
        assert_eq!(block.component(), "fallback");
    }
}
