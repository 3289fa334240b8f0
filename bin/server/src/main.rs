use std::sync::Arc;

use wicket_access::SessionManager;
use wicket_server::{AppState, ServerConfig, router};

#[tokio::main]
async fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    let auth = config
        .auth
        .resolve()
        .expect("failed to resolve auth configuration");
    tracing::info!(
        route_prefix = %auth.route_prefix,
        providers = auth.registry.providers().len(),
        dummy = auth.dummy,
        "Loaded configuration"
    );

    if auth.registry.is_empty() && !auth.dummy {
        tracing::warn!("no providers configured and dummy mode disabled; nobody can authenticate");
    }

    let state = Arc::new(AppState::new(SessionManager::in_memory(), auth));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
