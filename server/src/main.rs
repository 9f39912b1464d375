mod body;
mod config;
mod db;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use config::AuthConfig;
use services::gateway::OAuthGateway;
use store::{MemoryStore, PgStore, SessionStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Arc::new(AuthConfig::from_env());

    let store: Arc<dyn SessionStore> = match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections)
                .await
                .expect("database init failed");
            tracing::info!(max_connections = config.db_max_connections, "postgres session store ready");
            Arc::new(PgStore::new(pool))
        }
        None => Arc::new(MemoryStore::new()),
    };

    let gateway = OAuthGateway::new(config.clone(), store).expect("auth gateway init failed");

    let enabled = config.providers.enabled();
    if enabled.is_empty() {
        tracing::warn!("no OAuth providers configured, sign-in will fail");
    }
    for provider in enabled {
        tracing::info!(%provider, "OAuth provider enabled");
    }

    let state = state::AppState::new(config.clone(), Arc::new(gateway));
    let app = routes::app(state);

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, origin = %config.app_origin(), "auth server listening");
    axum::serve(listener, app).await.expect("server failed");
}
