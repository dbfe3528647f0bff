use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursedesk::api::router;
use coursedesk::auth::JwtIdentityProvider;
use coursedesk::config::AppConfig;
use coursedesk::events::CatalogEvents;
use coursedesk::state::AppState;
use coursedesk::{db, storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "coursedesk=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let pool = db::connect(&config.database_url, 5).await?;

    let state = AppState {
        db: pool,
        identity: Arc::new(JwtIdentityProvider::new(&config.jwt_secret)),
        screenshots: storage::from_config(&config)?,
        catalog_events: CatalogEvents::default(),
        config: Arc::new(config),
    };
    let addr = state.config.bind_addr;

    let app = router(state);

    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
