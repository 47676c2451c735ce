//! HTTP server: router, shared state and startup

mod handlers;
mod redirect;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::PostStore;
use crate::render::Renderer;
use crate::Vellum;

/// Shared per-server state
pub(crate) struct ServerState {
    pub config: SiteConfig,
    pub store: PostStore,
    pub renderer: Renderer,
}

impl ServerState {
    fn new(vellum: &Vellum) -> Self {
        Self {
            config: vellum.config.clone(),
            store: vellum.store(),
            renderer: vellum.renderer(),
        }
    }
}

/// Build the application router
pub(crate) fn router(vellum: &Vellum) -> Router {
    let state = Arc::new(ServerState::new(vellum));
    let favicon = ServeFile::new(vellum.static_dir.join("favicon.ico"));

    Router::new()
        .route("/", get(handlers::index))
        .route("/posts", get(handlers::posts_index))
        .route("/posts/:slug", get(handlers::post_page))
        .route("/tags/:tag", get(handlers::tag_page))
        .route_service("/favicon.ico", favicon)
        .fallback(handlers::static_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(vellum: &Vellum, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(vellum);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
