//! folio CLI - terminal front-end for a folio blog

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use folio_core::now_playing::NowPlaying;
use folio_core::render::{Tile, VisualBlock, layout_tiles};
use folio_core::{
    DisplaySize, Draft, FeedItem, FeedStatus, Folio, PostFilter, PostStatus, Profile,
    parse_kinds, render, resolve_config, slugify,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Browse and manage a personal blog and portfolio")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through the post feed
    Feed {
        /// Post types, comma separated (e.g. "photo,gallery")
        #[arg(short = 't', long = "type")]
        kinds: Option<String>,

        /// Publication status (admin)
        #[arg(long)]
        status: Option<PostStatus>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        tag: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        q: Option<String>,

        /// Display size for every item (defaults to the config's)
        #[arg(short, long)]
        size: Option<DisplaySize>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Print rendered blocks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single post
    Post {
        id: String,

        #[arg(short, long, default_value = "full")]
        size: DisplaySize,

        #[arg(long)]
        json: bool,
    },

    /// Compose posts from TOML draft files
    Draft {
        #[command(subcommand)]
        action: DraftCommands,
    },

    /// Delete a post (admin)
    Delete { id: String },

    /// Show or edit the About Me profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },

    /// Follow the now-playing stream
    NowPlaying,

    /// Write an example config and draft
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Print the slug derived from a title
    Slug {
        #[arg(required = true)]
        title: Vec<String>,
    },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Render a draft the way the feed would show it
    Preview {
        file: PathBuf,

        #[arg(short, long, default_value = "full")]
        size: DisplaySize,

        #[arg(long)]
        json: bool,
    },

    /// Check a draft without publishing it
    Validate { file: PathBuf },

    /// Create a post from a draft, or replace one with --id
    Publish {
        file: PathBuf,

        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    Show,

    /// Replace the profile with the contents of a TOML file (admin)
    Set { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,folio_core=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Feed {
            kinds,
            status,
            category,
            tag,
            q,
            size,
            pages,
            json,
        } => {
            let kinds = match kinds {
                Some(kinds) => parse_kinds(&kinds).map_err(anyhow::Error::msg)?,
                None => Vec::new(),
            };
            let filter = PostFilter {
                kinds,
                status,
                category,
                tag,
                q,
            };
            cmd_feed(config, filter, size, pages, json).await
        }
        Commands::Post { id, size, json } => cmd_post(config, &id, size, json).await,
        Commands::Draft { action } => match action {
            DraftCommands::Preview { file, size, json } => cmd_preview(&file, size, json),
            DraftCommands::Validate { file } => cmd_validate(&file),
            DraftCommands::Publish { file, id } => {
                cmd_publish(config, &file, id.as_deref()).await
            }
        },
        Commands::Delete { id } => cmd_delete(config, &id).await,
        Commands::Profile { action } => cmd_profile(config, action).await,
        Commands::NowPlaying => cmd_now_playing(config).await,
        Commands::Init { path } => cmd_init(&path),
        Commands::Slug { title } => {
            println!("{}", slugify(&title.join(" ")));
            Ok(())
        }
    }
}

fn load(config_path: Option<&Path>) -> Result<Folio> {
    let config = resolve_config(config_path)?;
    Ok(Folio::from_config(config)?)
}

fn read_draft(file: &Path) -> Result<Draft> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read draft {}", file.display()))?;
    Ok(Draft::from_toml(&source)?)
}

async fn cmd_feed(
    config_path: Option<&Path>,
    filter: PostFilter,
    size: Option<DisplaySize>,
    pages: u32,
    json: bool,
) -> Result<()> {
    let folio = load(config_path)?;
    let size = size.unwrap_or_else(|| folio.default_size());
    let feed = folio.feed();

    feed.set_filter(filter).await;
    for _ in 1..pages {
        if feed.load_more().await.is_none() {
            break;
        }
    }
    let snapshot = feed.snapshot().await;
    feed.close();

    match &snapshot.status {
        FeedStatus::Failed(message) => bail!("{}", message),
        FeedStatus::Empty => {
            println!("No posts found.");
            return Ok(());
        }
        _ => {}
    }

    let tiles = layout_tiles(&snapshot.feed_items(size));
    if json {
        println!("{}", serde_json::to_string_pretty(&tiles)?);
    } else {
        for tile in &tiles {
            print_tile(tile);
        }
        println!(
            "\nShowing {} of {} posts{}",
            snapshot.items.len(),
            snapshot.total_items,
            if snapshot.has_more { " (more available)" } else { "" }
        );
    }

    // A failed later page still leaves earlier pages on screen
    if let Some(error) = &snapshot.error {
        eprintln!("Error: {}", error);
    }

    Ok(())
}

async fn cmd_post(config_path: Option<&Path>, id: &str, size: DisplaySize, json: bool) -> Result<()> {
    let folio = load(config_path)?;
    let post = folio.client().fetch_post(id).await?;
    print_block(&render(&FeedItem::sized(post, size)), json)
}

fn cmd_preview(file: &Path, size: DisplaySize, json: bool) -> Result<()> {
    let draft = read_draft(file)?;
    match draft.to_preview() {
        Ok(post) => print_block(&render(&FeedItem::sized(post, size)), json),
        Err(folio_core::Error::Validation(errors)) => report_invalid(&errors),
        Err(e) => Err(e.into()),
    }
}

fn cmd_validate(file: &Path) -> Result<()> {
    let draft = read_draft(file)?;
    let errors = draft.validate();

    if errors.is_empty() {
        println!("✓ Draft is valid (slug: {})", draft.effective_slug());
        Ok(())
    } else {
        report_invalid(&errors)
    }
}

async fn cmd_publish(config_path: Option<&Path>, file: &Path, id: Option<&str>) -> Result<()> {
    let folio = load(config_path)?;
    if !folio.is_admin() {
        bail!("Publishing needs an API token ([api] token in the config)");
    }

    let draft = read_draft(file)?;
    let errors = draft.validate();
    if !errors.is_empty() {
        return report_invalid(&errors);
    }

    let post = folio.publish(&draft, id).await?;
    let state = if draft.draft { "draft" } else { "published" };
    println!(
        "Saved {} {} as {}",
        state,
        draft.kind,
        post.id().unwrap_or_default()
    );
    Ok(())
}

async fn cmd_delete(config_path: Option<&Path>, id: &str) -> Result<()> {
    let folio = load(config_path)?;
    folio.client().delete_post(id).await?;
    println!("Deleted {}", id);
    Ok(())
}

async fn cmd_profile(config_path: Option<&Path>, action: ProfileCommands) -> Result<()> {
    let folio = load(config_path)?;

    match action {
        ProfileCommands::Show => {
            let profile = folio.client().get_profile().await?;
            print_profile(&profile);
        }
        ProfileCommands::Set { file } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let profile: Profile = toml::from_str(&source)
                .with_context(|| format!("Invalid profile in {}", file.display()))?;

            let errors = profile.validate();
            if !errors.is_empty() {
                return report_invalid(&errors);
            }
            let saved = folio.client().update_profile(&profile).await?;
            println!("Profile updated");
            print_profile(&saved);
        }
    }

    Ok(())
}

async fn cmd_now_playing(config_path: Option<&Path>) -> Result<()> {
    let folio = load(config_path)?;
    let feed = match folio.now_playing_feed() {
        Some(feed) => feed?,
        None => bail!("No [now_playing] url configured"),
    };

    let hub = NowPlaying::new();
    let cancel = CancellationToken::new();

    let follower = {
        let hub = hub.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { feed.follow(&hub, cancel).await })
    };

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut last_line = String::new();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let line = match hub.current() {
                    Some(update) => {
                        let track = &update.track;
                        let progress = update
                            .progress_at(Instant::now())
                            .map(|p| format_ms(p.as_millis() as u64));
                        let total = track.duration_ms.map(format_ms);
                        let position = match (progress, total) {
                            (Some(p), Some(t)) => format!(" [{} / {}]", p, t),
                            (Some(p), None) => format!(" [{}]", p),
                            _ => String::new(),
                        };
                        let paused = if track.is_playing { "" } else { " (paused)" };
                        format!("♪ {} - {}{}{}", track.artist, track.title, position, paused)
                    }
                    None => "Nothing playing".to_string(),
                };
                if line != last_line {
                    println!("{}", line);
                    last_line = line;
                }
            }
        }
    }

    cancel.cancel();
    follower.await?;
    Ok(())
}

fn cmd_init(path: &Path) -> Result<()> {
    use std::fs;

    let drafts_dir = path.join("drafts");
    fs::create_dir_all(&drafts_dir)?;

    let folio_config = r#"[api]
base_url = "https://example.com/api"
# token = "env:FOLIO_API_TOKEN"  # Enables publishing and profile editing
# timeout_secs = 15

[feed]
page_size = 12
default_size = "medium"

# [now_playing]
# url = "https://example.com/api/now-playing/stream"
"#;
    fs::write(path.join("folio.toml"), folio_config)?;

    let hello_draft = r#"type = "article"
title = "Hello World"
tags = ["meta"]
draft = true
excerpt = "Welcome to my new site"
content = """
# Hello World

This post was written as a folio draft.
"""
"#;
    fs::write(drafts_dir.join("hello-world.toml"), hello_draft)?;

    let photo_draft = r#"type = "photo"
title = "First Light"
caption = "Morning over the bay"
location = "Sausalito, CA"

[image]
url = "https://images.example.com/first-light.jpg"
alt = "Sunrise over calm water"
"#;
    fs::write(drafts_dir.join("first-light.toml"), photo_draft)?;

    println!("Initialized folio in {}", path.display());
    println!("  - Created folio.toml (edit with your API URL)");
    println!("  - Created drafts/ with example drafts");
    println!();
    println!("Next steps:");
    println!("  1. Point [api] base_url at your blog API");
    println!("  2. Run `folio feed` to browse posts");
    println!("  3. Run `folio draft preview drafts/hello-world.toml`");

    Ok(())
}

fn report_invalid(errors: &[folio_core::ValidationError]) -> Result<()> {
    println!("Found {} validation error(s):\n", errors.len());
    for error in errors {
        println!("  {} : {}", error.path, error.message);
    }
    std::process::exit(1);
}

fn print_block(block: &VisualBlock, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(block)?);
    } else {
        for line in describe(block) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn print_tile(tile: &Tile) {
    let width = if tile.span.columns > 1 { "wide" } else { "    " };
    let mut lines = describe(&tile.block).into_iter();
    if let Some(first) = lines.next() {
        println!("[{}] {}", width, first);
    }
    for line in lines {
        println!("       {}", line);
    }
}

/// Plain-text rendering of a block, one entry per line.
fn describe(block: &VisualBlock) -> Vec<String> {
    let mut lines = vec![format!("<{}>", block.component())];
    let mut push = |label: &str, value: &str| {
        if !value.is_empty() {
            lines.push(format!("{}: {}", label, value));
        }
    };

    match block {
        VisualBlock::Hero(p) => {
            push("title", &p.title);
            push("subtitle", p.subtitle.as_deref().unwrap_or_default());
            push("badge", p.badge.as_deref().unwrap_or_default());
            if let Some(cta) = &p.cta {
                push(&cta.label, &cta.href);
            }
        }
        VisualBlock::Content(p) => {
            push("title", &p.title);
            push("meta", p.meta.as_deref().unwrap_or_default());
            push("body", &p.body);
        }
        VisualBlock::CompactArticle(p) => {
            push("title", &p.title);
            push("date", &p.date);
            push("excerpt", &p.excerpt);
        }
        VisualBlock::LargePhoto(p) | VisualBlock::PhotoCard(p) => {
            push("title", &p.title);
            push("image", &p.image_url);
            push("caption", p.caption.as_deref().unwrap_or_default());
            push("location", p.location.as_deref().unwrap_or_default());
        }
        VisualBlock::GalleryGrid(p) => {
            push("title", &p.title);
            push("images", &p.images.len().to_string());
        }
        VisualBlock::Quote(p) => {
            push("quote", &p.text);
            push("source", p.source.as_deref().unwrap_or_default());
        }
        VisualBlock::Note(p) => {
            push("note", &p.text);
            push("date", &p.date);
        }
        VisualBlock::MediaRow(p) => {
            push("title", &p.title);
            push("artist", &p.artist);
            push("duration", p.duration.as_deref().unwrap_or_default());
            for track in &p.tracks {
                push(
                    &format!("  {:>2}", track.number),
                    &format!(
                        "{} {}",
                        track.title,
                        track.duration.as_deref().unwrap_or_default()
                    ),
                );
            }
        }
        VisualBlock::LinkCard(p) => {
            push("title", &p.title);
            push("link", &format!("{} ({})", p.url, p.domain));
            push("description", p.description.as_deref().unwrap_or_default());
        }
        VisualBlock::ImageOverlay(p) => {
            push("title", &p.title);
            push("badge", p.badge.as_deref().unwrap_or_default());
        }
        VisualBlock::RecommendationCard(p) => {
            push("title", &p.title);
            push("subject", &p.subject);
            push("reason", &p.reason);
        }
        VisualBlock::RatingCard(p) => {
            push("title", &p.title);
            push("subject", &p.subject);
            push("score", &format!("{} {}/{}", p.stars, p.score, p.max_score));
        }
        VisualBlock::RankingList(p) => {
            push("title", &p.title);
            for entry in &p.entries {
                push(&format!("  #{}", entry.rank), &entry.title);
            }
        }
        VisualBlock::Fallback(p) => push("message", &p.message),
    }

    lines
}

fn print_profile(profile: &Profile) {
    println!("{}", profile.name);
    if let Some(headline) = &profile.headline {
        println!("{}", headline);
    }
    if let Some(location) = &profile.location {
        println!("📍 {}", location);
    }
    if !profile.bio.is_empty() {
        println!("\n{}", profile.bio);
    }
    for link in &profile.links {
        println!("  {} - {}", link.label, link.url);
    }
}

fn format_ms(ms: u64) -> String {
    folio_core::render::format_duration((ms / 1000) as u32)
}
