use std::sync::Arc;

use common_auth::JwtVerifier;
use drinks_service::app_state::AppState;
use drinks_service::config::ServiceConfig;
use drinks_service::routes::build_router;
use drinks_service::store::DrinkStore;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        domain = %config.jwt.issuer_domain,
        audience = %config.jwt.audience,
        jwks_cache_ttl = ?config.jwt.jwks_cache_ttl,
        "auth configured"
    );

    let store = Arc::new(DrinkStore::new());
    if config.seed_demo {
        store.seed_demo().await;
    }
    let verifier = Arc::new(JwtVerifier::new(config.jwt.clone()));
    let app = build_router(AppState::new(store, verifier));

    let addr = config.addr();
    tracing::info!(%addr, "starting drinks-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
