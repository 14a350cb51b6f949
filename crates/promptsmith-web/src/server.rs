//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use promptsmith::Enhancer;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::api::{self, AppState};

/// Build the REST router over a shared [`Enhancer`].
pub fn build_router(enhancer: Arc<Enhancer>, permissive_cors: bool) -> Router {
    let app_state = AppState { enhancer };

    let router = Router::new()
        .route("/api/enhance", post(api::post_enhance))
        .route("/api/instruction", post(api::post_instruction))
        .route("/api/platforms", get(api::get_platforms))
        .route("/api/health", get(api::get_health))
        .with_state(app_state);

    if permissive_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Bind `bind_addr`, serve `router` on a background task, and return the
/// bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;
    info!("promptsmith-web listening on {addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("Server error: {e}");
        }
    });

    Ok(addr)
}
