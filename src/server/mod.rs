//! Development server rendering pages from the published snapshot

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{BuildMode, Entry, Post, Work};
use crate::error::RenderError;
use crate::helpers::html_escape;
use crate::index::SnapshotHandle;
use crate::pages::PageBuilder;
use crate::render::{self, ComponentRegistry, Highlighter, RenderBinder};
use crate::{watch, Folio};

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Shared>,
}

struct Shared {
    config: SiteConfig,
    snapshots: SnapshotHandle,
    registry: ComponentRegistry,
    highlighter: Option<Highlighter>,
}

impl AppState {
    pub fn new(
        config: SiteConfig,
        snapshots: SnapshotHandle,
        registry: ComponentRegistry,
        highlighter: Option<Highlighter>,
    ) -> Self {
        Self {
            inner: Arc::new(Shared {
                config,
                snapshots,
                registry,
                highlighter,
            }),
        }
    }

    fn binder(&self) -> RenderBinder<'_> {
        let binder = RenderBinder::new(&self.inner.registry);
        match &self.inner.highlighter {
            Some(highlighter) => binder.with_highlighter(highlighter),
            None => binder,
        }
    }

    fn pages(&self) -> PageBuilder<'_> {
        PageBuilder::new(&self.inner.config)
    }

    fn error_page(&self, error: &RenderError) -> Response {
        if error.is_not_found() {
            return (StatusCode::NOT_FOUND, Html(self.pages().not_found_page())).into_response();
        }
        tracing::error!("Render failed: {}", error);
        let body = format!(
            "<section class=\"error\"><h1>Render error</h1><pre>{}</pre></section>",
            html_escape(&error.to_string())
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(self.pages().layout("Render error", None, &body)),
        )
            .into_response()
    }
}

/// Routes over `state`; anything else is served from `static_dir`
pub fn router(state: AppState, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/posts/:slug/", get(post_handler))
        .route("/works/:slug", get(work_handler))
        .route("/works/:slug/", get(work_handler))
        .route("/api/:collection", get(api_handler))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home_handler(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.inner.snapshots.load();
    Html(state.pages().home_page(&snapshot))
}

async fn post_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let snapshot = state.inner.snapshots.load();
    match state.binder().post(&snapshot, &slug) {
        Ok(rendered) => Html(state.pages().post_page(&snapshot, &rendered)).into_response(),
        Err(e) => state.error_page(&e),
    }
}

async fn work_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let snapshot = state.inner.snapshots.load();
    match state.binder().work(&snapshot, &slug) {
        Ok(rendered) => Html(state.pages().work_page(&rendered)).into_response(),
        Err(e) => state.error_page(&e),
    }
}

/// A collection as JSON, in listing order
async fn api_handler(State(state): State<AppState>, Path(collection): Path<String>) -> Response {
    let snapshot = state.inner.snapshots.load();
    match collection.as_str() {
        Post::COLLECTION => Json(&snapshot.posts).into_response(),
        Work::COLLECTION => Json(&snapshot.works).into_response(),
        _ => (StatusCode::NOT_FOUND, format!("Unknown collection: {}", collection)).into_response(),
    }
}

/// Start the development server.
///
/// With `watch`, content changes are re-ingested and published while the
/// server runs. Ctrl+C stops the watcher and shuts the server down.
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    let loader = folio.loader(BuildMode::Watch);
    let cancel = loader.cancel_flag();
    let snapshots = SnapshotHandle::default();

    let problems = watch::reingest(&loader, &snapshots)?;
    if problems > 0 {
        tracing::warn!("Serving with {} content problem(s)", problems);
    }

    let state = AppState::new(
        folio.config.clone(),
        snapshots.clone(),
        render::standard(),
        folio.highlighter(),
    );
    let app = router(state, folio.public_dir.clone());

    let watcher = if watch {
        Some(tokio::task::spawn_blocking(move || {
            if let Err(e) = watch::watch(&loader, &snapshots) {
                tracing::error!("File watcher error: {}", e);
            }
        }))
    } else {
        None
    };

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching content for changes...");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.store(true, Ordering::SeqCst);
    if let Some(watcher) = watcher {
        watcher.await?;
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal(cancel: Arc<AtomicBool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    tracing::info!("Shutting down...");
    cancel.store(true, Ordering::SeqCst);
}
