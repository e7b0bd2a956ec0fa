//! Post composer: drafts, slugs and pre-publish validation
//!
//! A [`Draft`] holds the editable fields of a post. The shared fields are
//! typed; the fields specific to the post's type are kept as a JSON map using
//! the API's own camelCase names, so a draft for any of the thirteen types
//! has the same shape. Turning a draft into a [`Post`] goes through the same
//! deserializer the feed uses, which is what catches missing required fields.

use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by [`Draft`] itself rather than its type-specific map.
const BASE_KEYS: &[&str] = &[
    "type",
    "id",
    "slug",
    "title",
    "createdAt",
    "updatedAt",
    "tags",
    "category",
    "featured",
    "draft",
    "author",
];

/// Editable post fields
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub title: String,
    /// Derived from the title when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_draft")]
    pub draft: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn default_draft() -> bool {
    true
}

impl Draft {
    pub fn new(kind: PostKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            slug: None,
            tags: Vec::new(),
            category: None,
            featured: false,
            draft: true,
            fields: Map::new(),
        }
    }

    /// Set a type-specific field, e.g. `("coverImage", json!("..."))`.
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Parse a draft file. Type-specific fields use the API's camelCase names
    /// and dates are RFC 3339 strings.
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::Decode(format!("Invalid draft: {}", e)))
    }

    /// Pre-populate the editor from a saved post.
    pub fn from_post(post: &Post) -> Option<Self> {
        let base = post.base()?;
        let kind = post.kind()?;

        let mut fields = match serde_json::to_value(post) {
            Ok(Value::Object(map)) => map,
            _ => return None,
        };
        for key in BASE_KEYS {
            fields.remove(*key);
        }

        Some(Self {
            kind,
            title: base.title.clone(),
            slug: (!base.slug.is_empty()).then(|| base.slug.clone()),
            tags: base.tags.clone(),
            category: base.category.clone(),
            featured: base.featured,
            draft: base.draft,
            fields,
        })
    }

    /// The slug this draft will be saved under.
    pub fn effective_slug(&self) -> String {
        match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slugify(slug),
            _ => slugify(&self.title),
        }
    }

    /// Problems that would stop this draft from being published.
    pub fn validate(&self) -> Vec<ValidationError> {
        self.build(PREVIEW_ID, Utc::now()).err().unwrap_or_default()
    }

    /// Build the unsaved post shown in the composer's live preview.
    pub fn to_preview(&self) -> Result<Post> {
        self.build(PREVIEW_ID, Utc::now())
            .map_err(Error::Validation)
    }

    /// Request body for create/update. The server owns `id` and `createdAt`.
    pub fn to_payload(&self) -> Result<Value> {
        let post = self.to_preview()?;
        let mut value =
            serde_json::to_value(&post).map_err(|e| Error::Decode(e.to_string()))?;
        if let Value::Object(map) = &mut value {
            map.remove("id");
            map.remove("createdAt");
        }
        Ok(value)
    }

    fn build(
        &self,
        id: &str,
        created_at: DateTime<Utc>,
    ) -> std::result::Result<Post, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(invalid("title", "Title is empty"));
        }

        let mut object = self.fields.clone();
        object.insert("type".into(), Value::from(self.kind.as_str()));
        object.insert("id".into(), Value::from(id));
        object.insert("slug".into(), Value::from(self.effective_slug()));
        object.insert("title".into(), Value::from(self.title.trim()));
        object.insert("createdAt".into(), Value::from(created_at.to_rfc3339()));
        object.insert("tags".into(), Value::from(clean_tags(&self.tags)));
        if let Some(category) = self.category.as_deref().map(str::trim)
            && !category.is_empty()
        {
            object.insert("category".into(), Value::from(category));
        }
        object.insert("featured".into(), Value::from(self.featured));
        object.insert("draft".into(), Value::from(self.draft));

        match serde_json::from_value::<Post>(Value::Object(object)) {
            Ok(post) => {
                check_fields(&post, &mut errors);
                if errors.is_empty() {
                    Ok(post)
                } else {
                    Err(errors)
                }
            }
            Err(e) => {
                errors.push(invalid(self.kind.as_str(), &e.to_string()));
                Err(errors)
            }
        }
    }
}

/// Derive a URL-safe slug from a title.
///
/// Lowercase ASCII letters and digits separated by single dashes. Common
/// Latin accents are folded; anything else is a separator.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        let lower = c.to_ascii_lowercase();
        let folded = if lower.is_ascii_alphanumeric() {
            None
        } else {
            match fold(c) {
                "" => {
                    pending_dash = true;
                    continue;
                }
                s => Some(s),
            }
        };
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        match folded {
            Some(s) => slug.push_str(s),
            None => slug.push(lower),
        }
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// ASCII spelling of an accented letter, or "" for a separator.
fn fold(c: char) -> &'static str {
    match c.to_lowercase().next().unwrap_or(c) {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        _ => "",
    }
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn invalid(path: &str, message: &str) -> ValidationError {
    ValidationError {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn check_fields(post: &Post, errors: &mut Vec<ValidationError>) {
    match post {
        Post::Article(a) => {
            if a.content.trim().is_empty() {
                errors.push(invalid("content", "Article body is empty"));
            }
        }
        Post::Photo(p) => {
            if p.image.url.trim().is_empty() {
                errors.push(invalid("image.url", "Photo needs an image URL"));
            }
        }
        Post::Gallery(g) => {
            if g.images.is_empty() {
                errors.push(invalid("images", "Gallery has no images"));
            }
            for (i, img) in g.images.iter().enumerate() {
                if img.url.trim().is_empty() {
                    errors.push(invalid(&format!("images[{}].url", i), "Image URL is empty"));
                }
            }
        }
        Post::Thought(t) => {
            if t.content.trim().is_empty() {
                errors.push(invalid("content", "Thought is empty"));
            }
        }
        Post::Music(m) => {
            if m.audio.url.trim().is_empty() {
                errors.push(invalid("audio.url", "Music needs an audio URL"));
            }
        }
        Post::Video(v) => {
            if !is_http_url(&v.video.url) {
                errors.push(invalid("video.url", "Video needs an http(s) URL"));
            }
        }
        Post::Link(l) => {
            if !is_http_url(&l.url) {
                errors.push(invalid("url", "Link needs an http(s) URL"));
            }
        }
        Post::Event(e) => {
            if let Some(end) = e.end_date
                && end < e.start_date
            {
                errors.push(invalid("endDate", "Event ends before it starts"));
            }
        }
        Post::Rating(r) => {
            if r.max_score <= 0.0 {
                errors.push(invalid("maxScore", "Maximum score must be positive"));
            } else if !(0.0..=r.max_score).contains(&r.score) {
                errors.push(invalid(
                    "score",
                    &format!("Score must be between 0 and {}", r.max_score),
                ));
            }
        }
        Post::Ranking(r) => {
            if r.items.is_empty() {
                errors.push(invalid("items", "Ranking has no items"));
            }
            for (i, item) in r.items.iter().enumerate() {
                if item.rank == 0 {
                    errors.push(invalid(&format!("items[{}].rank", i), "Ranks start at 1"));
                }
            }
        }
        Post::Project(_)
        | Post::Announcement(_)
        | Post::Recommendation(_)
        | Post::Unsupported => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{VisualBlock, render_detail};
    use serde_json::json;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust 2024: what's new?  "), "rust-2024-what-s-new");
        assert_eq!(slugify("Café Crème"), "cafe-creme");
        assert_eq!(slugify("!!!"), "untitled");
        assert_eq!(slugify("a--b"), "a-b");
    }

    #[test]
    fn test_preview_article() {
        let draft = Draft::new(PostKind::Article, "My First Post")
            .with_field("content", json!("Hello there"));

        let post = draft.to_preview().unwrap();
        assert!(post.is_preview());
        let base = post.base().unwrap();
        assert_eq!(base.slug, "my-first-post");
        assert!(base.draft);

        // Previews render without detail links
        match render_detail(&post) {
            VisualBlock::Content(c) => assert!(c.href.is_none()),
            other => panic!("expected content, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_slug_is_normalized() {
        let mut draft = Draft::new(PostKind::Thought, "Anything");
        draft.slug = Some("My Custom Slug".to_string());
        assert_eq!(draft.effective_slug(), "my-custom-slug");
    }

    #[test]
    fn test_validate_reports_missing_required_field() {
        let draft = Draft::new(PostKind::Photo, "Sunset");
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "photo");
        assert!(errors[0].message.contains("image"));
    }

    #[test]
    fn test_validate_reports_field_rules() {
        let draft = Draft::new(PostKind::Ranking, " ")
            .with_field("items", json!([{"rank": 0, "title": "Zero"}]));
        let errors = draft.validate();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["title", "items[0].rank"]);
    }

    #[test]
    fn test_event_end_before_start() {
        let draft = Draft::new(PostKind::Event, "Meetup")
            .with_field("startDate", json!("2026-06-05T18:00:00Z"))
            .with_field("endDate", json!("2026-06-04T18:00:00Z"));
        let errors = draft.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "endDate");
    }

    #[test]
    fn test_payload_omits_server_fields() {
        let draft = Draft::new(PostKind::Link, "A good read")
            .with_field("url", json!("https://example.com/article"));
        let mut tagged = draft.clone();
        tagged.tags = vec![" rust ".to_string(), "rust".to_string(), "".to_string()];

        let payload = tagged.to_payload().unwrap();
        assert!(payload.get("id").is_none());
        assert!(payload.get("createdAt").is_none());
        assert_eq!(payload["type"], "link");
        assert_eq!(payload["slug"], "a-good-read");
        assert_eq!(payload["tags"], json!(["rust"]));
    }

    #[test]
    fn test_invalid_draft_payload_is_validation_error() {
        let draft = Draft::new(PostKind::Link, "Bad").with_field("url", json!("not a url"));
        assert!(matches!(draft.to_payload(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
type = "music"
title = "Late Night Mix"
tags = ["ambient"]
featured = true

[audio]
url = "https://cdn.example.com/mix.mp3"
title = "Late Night Mix"
artist = "DJ Someone"
duration = 3600
"#;
        let draft = Draft::from_toml(source).unwrap();
        assert_eq!(draft.kind, PostKind::Music);
        assert!(draft.draft);
        assert!(draft.featured);

        let post = draft.to_preview().unwrap();
        let Post::Music(music) = post else {
            panic!("expected music");
        };
        assert_eq!(music.audio.duration, Some(3600));
    }

    #[test]
    fn test_from_toml_rejects_unknown_type() {
        let result = Draft::from_toml("type = \"hologram\"\ntitle = \"x\"\n");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_from_post_round_trips_fields() {
        let draft = Draft::new(PostKind::Video, "Talk")
            .with_field("video", json!({"url": "https://video.example.com/1", "embedUrl": "https://video.example.com/embed/1"}));
        let post = draft.to_preview().unwrap();

        let edited = Draft::from_post(&post).unwrap();
        assert_eq!(edited.kind, PostKind::Video);
        assert_eq!(edited.slug.as_deref(), Some("talk"));
        assert!(edited.fields.get("id").is_none());
        assert_eq!(
            edited.fields["video"]["embedUrl"],
            "https://video.example.com/embed/1"
        );
        assert!(Draft::from_post(&Post::Unsupported).is_none());
    }
}
