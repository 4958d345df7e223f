//! Web interface for the study catalog.
//!
//! Pages for browsing studies and submitting snippets, plus a small JSON API
//! over the same [`InsightService`].

mod assets;
mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::models::PromptMode;
use crate::services::InsightService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InsightService>,
    /// Mode used when a form or API request doesn't name one.
    pub default_mode: PromptMode,
    /// One permit: only one generation runs at a time.
    pub busy: Arc<Semaphore>,
}

impl AppState {
    pub fn new(service: InsightService, default_mode: PromptMode) -> Self {
        Self {
            service: Arc::new(service),
            default_mode,
            busy: Arc::new(Semaphore::new(1)),
        }
    }
}

/// Start the web server.
pub async fn serve(
    service: InsightService,
    default_mode: PromptMode,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let state = AppState::new(service, default_mode);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
