//! Browser UI for routewise
//!
//! A small axum app serving one server-rendered page. Per-browser state lives
//! in a [`SessionStore`] keyed by a session cookie.

pub mod handlers;
pub mod page;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::error::Result;
use crate::core::provider::{DirectionsProvider, LanguageModel};
use crate::core::session::SessionStore;

/// Shared state handed to every handler
pub struct AppState<D, L> {
    pub directions: D,
    /// `None` disables route Q&A and chat
    pub assistant: Option<L>,
    pub sessions: SessionStore,
}

impl<D, L> AppState<D, L> {
    pub fn new(directions: D, assistant: Option<L>) -> Self {
        Self {
            directions,
            assistant,
            sessions: SessionStore::new(),
        }
    }
}

/// Build the application router
pub fn router<D, L>(state: Arc<AppState<D, L>>) -> Router
where
    D: DirectionsProvider + 'static,
    L: LanguageModel + 'static,
{
    Router::new()
        .route("/", get(handlers::index::<D, L>))
        .route("/optimize", post(handlers::optimize::<D, L>))
        .route("/ask", post(handlers::ask::<D, L>))
        .route("/chat", post(handlers::chat::<D, L>))
        .route("/api/session", get(handlers::session_json::<D, L>))
        .with_state(state)
}

/// Serve the UI on `addr` until the process is stopped
pub async fn run_server<D, L>(state: AppState<D, L>, addr: &str) -> Result<()>
where
    D: DirectionsProvider + 'static,
    L: LanguageModel + 'static,
{
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🚀 Routewise listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
