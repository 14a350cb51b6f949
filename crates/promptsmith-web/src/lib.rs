//! HTTP relay for `promptsmith` prompt enhancement.
//!
//! `promptsmith-web` exposes an [`Enhancer`] over a small JSON REST API so
//! browser extensions and other clients can enhance prompts without holding
//! an API key themselves.
//!
//! # Quick start
//!
//! ```ignore
//! use promptsmith::prelude::*;
//! use promptsmith_web::{WebConfig, spawn_web};
//! use std::sync::Arc;
//!
//! let client = OpenRouterClient::new(api_key)?;
//! let enhancer = Enhancer::new(Arc::new(DirectoryGuides::new("guides")), Arc::new(client));
//!
//! let addr = spawn_web(enhancer, WebConfig::default()).await?;
//! println!("Listening on http://{addr}");
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | `POST` | `/api/enhance` | `{prompt, platform}` | [`Enhancement`](promptsmith::Enhancement) |
//! | `POST` | `/api/instruction` | `{prompt, platform}` | [`Preview`](promptsmith::Preview) |
//! | `GET` | `/api/platforms` | | `{platforms: [..]}` |
//! | `GET` | `/api/health` | | `{status: "ok"}` |
//!
//! Failures are `{"error": "..."}` with 400 for bad input, 404 for an
//! unknown platform, 500 for guide store failures and 502 when the
//! completion backend fails.

mod api;
mod server;

pub use api::ApiError;
pub use server::{build_router, start_server};

use std::net::SocketAddr;
use std::sync::Arc;

use promptsmith::Enhancer;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
    /// Allow cross-origin requests from any origin. Default: `true`.
    ///
    /// Browser extensions call the relay from their own origin, so this is
    /// on unless the relay sits behind a proxy that handles CORS.
    pub permissive_cors: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            permissive_cors: true,
        }
    }
}

impl WebConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down. Binding to port 0
/// picks a free port, which is what the returned address reports.
pub async fn spawn_web(enhancer: Enhancer, config: WebConfig) -> std::io::Result<SocketAddr> {
    let router = build_router(Arc::new(enhancer), config.permissive_cors);
    start_server(router, config.bind_addr).await
}
