//! Development server exposing the post collection as JSON, with hot reload

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::new_debouncer;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{FrontMatter, Post};
use crate::feed::RssFeed;
use crate::source::FsSource;
use crate::store::PostStore;
use crate::Site;

/// Server state
pub struct ServerState {
    pub config: SiteConfig,
    pub store: PostStore,
}

/// Errors returned to API clients
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no post with slug `{0}`")]
    PostNotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::PostNotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Post listing entry, without the body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostSummary<'a> {
    slug: &'a str,
    frontmatter: &'a FrontMatter,
    date: DateTime<Utc>,
}

impl<'a> From<&'a Post> for PostSummary<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            slug: &post.slug,
            frontmatter: &post.frontmatter,
            date: post.date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    /// Comma-separated tags, all of which must match
    tag: Option<String>,
    /// Free text search
    q: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TagCount {
    name: String,
    count: usize,
}

/// Build the API router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/tags", get(list_tags))
        .route("/rss.xml", get(rss_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool) -> Result<()> {
    let source = site.source()?;
    let store = PostStore::open(site.loader(), &source)?;

    let state = Arc::new(ServerState {
        config: site.config.clone(),
        store,
    });

    let app = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving {} posts at http://{}:{}", state.store.snapshot().len(), ip, port);
    if watch {
        println!("Watching {} for changes...", site.source_dir.display());

        let source_dir = site.source_dir.clone();
        let state = state.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(source_dir, source, state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the posts directory and reload the store on change
fn watch_and_reload(source_dir: PathBuf, source: FsSource, state: Arc<ServerState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&source_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", source_dir);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git") && !path_str.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                for event in &events {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // On failure the previous collection keeps serving
                if let Err(e) = state.store.reload(&source) {
                    tracing::error!("Reload failed, keeping previous posts: {}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ListParams>,
) -> Response {
    let posts = state.store.snapshot();

    let tags: Vec<&str> = params
        .tag
        .as_deref()
        .map(|t| t.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
        .unwrap_or_default();
    let query = params.q.as_deref().unwrap_or("");

    let summaries: Vec<PostSummary> = posts
        .filter_by_tags(&tags)
        .into_iter()
        .filter(|p| query.trim().is_empty() || p.matches_query(query.trim()))
        .take(params.limit.unwrap_or(usize::MAX))
        .map(PostSummary::from)
        .collect();

    Json(summaries).into_response()
}

async fn get_post(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let posts = state.store.snapshot();
    let post = posts
        .get_by_slug(&slug)
        .ok_or_else(|| ApiError::PostNotFound(slug.clone()))?;
    Ok(Json(post).into_response())
}

async fn list_tags(State(state): State<Arc<ServerState>>) -> Json<Vec<TagCount>> {
    let tags = state
        .store
        .snapshot()
        .tag_counts()
        .into_iter()
        .map(|(name, count)| TagCount { name, count })
        .collect();
    Json(tags)
}

async fn rss_feed(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let posts = state.store.snapshot();
    let xml = RssFeed::new(&state.config).render(posts.posts(), Utc::now());
    ([(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")], xml)
}
