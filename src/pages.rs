// src/pages.rs
use crate::errors::NavigationError;
use crate::loader::LoaderData;
use crate::podcast::Podcast;
use crate::query_cache::QueryKey;
use crate::router::RouteOutcome;
use crate::routes::RouteTree;
use crate::shell::ShellContext;
use log::{debug, warn};
use unicode_width::UnicodeWidthChar;

const DEFAULT_TEXT_WIDTH: usize = 80;
const TITLE_COLUMN_WIDTH: usize = 60;

/// Page components bound to route nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Root,
    Onboarding,
    UserAccount,
    DeviceName,
    AppShell,
    Home,
    PodcastDetail,
}

impl Page {
    pub fn name(&self) -> &'static str {
        match self {
            Page::Root => "root",
            Page::Onboarding => "onboarding",
            Page::UserAccount => "user-account",
            Page::DeviceName => "device-name",
            Page::AppShell => "app-shell",
            Page::Home => "home",
            Page::PodcastDetail => "podcast-detail",
        }
    }

    /// Renders this page's own section. Layout pages without chrome return `None`
    /// and only their children show up.
    async fn render(&self, data: Option<&LoaderData>, ctx: &ShellContext) -> Option<String> {
        match self {
            Page::Root => None,
            Page::Onboarding => Some("== Welcome ==".to_string()),
            Page::UserAccount => Some(
                "Create a new account, or paste the access key of an existing one.".to_string(),
            ),
            Page::DeviceName => Some("Give this device a name so you can tell it apart.".to_string()),
            Page::AppShell => Some("== Podcasts ==".to_string()),
            Page::Home => Some(render_home(ctx).await),
            Page::PodcastDetail => Some(match data.and_then(LoaderData::as_podcast) {
                Some(podcast) => render_podcast_detail(podcast),
                None => {
                    warn!("PodcastDetail rendered without loader data");
                    "No podcast data.".to_string()
                }
            }),
        }
    }
}

/// Renders a committed navigation: the matched chain top-down, or the error
/// boundary when the navigation failed.
pub async fn render_outcome(tree: &RouteTree, outcome: &RouteOutcome, ctx: &ShellContext) -> String {
    match outcome {
        RouteOutcome::Ready(resolved) => {
            let mut sections = Vec::new();
            for id in resolved.route().chain() {
                let page = tree.node(*id).page();
                debug!("Rendering {} for {}", page.name(), resolved.location());
                if let Some(section) = page.render(resolved.data_for(*id), ctx).await {
                    sections.push(section);
                }
            }
            sections.join("\n")
        }
        RouteOutcome::Failed { location, error } => render_error_boundary(location, error),
    }
}

pub fn render_error_boundary(location: &str, error: &NavigationError) -> String {
    let headline = match error {
        NavigationError::NoMatch(_) => "Page not found",
        NavigationError::Loader { source, .. } if source.is_not_found() => "Podcast not found",
        NavigationError::Loader { .. } => "Something went wrong",
    };
    format!("== {} ==\nLocation: {}\n{}", headline, location, error)
}

async fn render_home(ctx: &ShellContext) -> String {
    let client = ctx.client().clone();
    let result = ctx
        .cache()
        .fetch_query(QueryKey::AllPodcasts, || async move { client.list_all().await })
        .await;

    match result {
        Ok(podcasts) if podcasts.is_empty() => "No podcasts yet.".to_string(),
        Ok(podcasts) => podcasts
            .iter()
            .map(|p| format!("{:>6}  {}", p.id(), fit_to_width(p.title(), TITLE_COLUMN_WIDTH)))
            .collect::<Vec<String>>()
            .join("\n"),
        Err(e) => {
            warn!("Home: failed to list podcasts: {}", e);
            format!("Failed to load podcasts: {}", e)
        }
    }
}

fn render_podcast_detail(podcast: &Podcast) -> String {
    format!("{}\n{}", podcast.to_string().trim_end(), format_description(podcast.description()))
}

/// Truncates to `width` terminal columns, marking the cut with an ellipsis.
fn fit_to_width(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }

    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

pub fn format_description(description: Option<&str>) -> String {
    match description {
        Some(desc_str) => {
            // A simple heuristic: if it looks like HTML, try to convert it.
            if desc_str.contains('<') && desc_str.contains('>') && desc_str.contains("</") {
                match html2text::from_read(desc_str.as_bytes(), DEFAULT_TEXT_WIDTH) {
                    Ok(text_content) => text_content
                        .lines()
                        .map(|line| line.trim_end())
                        .filter(|line| !line.is_empty())
                        .collect::<Vec<&str>>()
                        .join("\n"),
                    Err(e) => {
                        warn!("Failed to convert HTML description: {}", e);
                        desc_str.to_string()
                    }
                }
            } else {
                desc_str.to_string()
            }
        }
        None => "No description available for this podcast.".to_string(),
    }
    .trim()
    .to_string()
}
