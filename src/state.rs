use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::IdentityProvider;
use crate::config::AppConfig;
use crate::events::CatalogEvents;
use crate::storage::ScreenshotStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub screenshots: Arc<dyn ScreenshotStore>,
    pub catalog_events: CatalogEvents,
}
