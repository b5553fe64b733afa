use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let cfg = configs::AppConfig::load_or_env()?;
    Ok(cfg.server.bind_addr().parse()?)
}

/// Fail fast on missing variables, then warm the shared Supabase client.
fn check_backend() -> anyhow::Result<AppState> {
    configs::validate_env()?;
    let client = service::supabase::get_server_client()?;
    info!(url = client.url(), "supabase server client ready");

    let public = match configs::get_public_config() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(error = %e, "public configuration unavailable");
            None
        }
    };
    Ok(AppState::new(public))
}

/// Public entry: build the app and run the HTTP server.
/// Expects `.env` and logging to be set up by the caller.
pub async fn run() -> anyhow::Result<()> {
    let state = check_backend()?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr()?;
    info!(%addr, "starting academy api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
