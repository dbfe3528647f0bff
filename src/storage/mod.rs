pub mod disk;
pub mod dto;
pub mod hosted;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, ScreenshotBackend};
use crate::error::AppError;
use crate::validation::ProofImage;

pub use disk::DiskScreenshotStore;
pub use hosted::HostedImageStore;

/// Stores a payment screenshot and hands back a URL anyone can fetch.
#[async_trait]
pub trait ScreenshotStore: Send + Sync {
    async fn store(&self, owner_id: &str, image: ProofImage) -> Result<String, AppError>;
}

pub fn from_config(config: &AppConfig) -> Result<Arc<dyn ScreenshotStore>, AppError> {
    let store: Arc<dyn ScreenshotStore> = match &config.screenshot_backend {
        ScreenshotBackend::Disk => Arc::new(DiskScreenshotStore::new(
            config.upload_dir.clone(),
            config.public_base_url.clone(),
        )),
        ScreenshotBackend::Hosted { upload_url, upload_preset } => Arc::new(
            HostedImageStore::new(upload_url.clone(), upload_preset.clone())?,
        ),
    };
    Ok(store)
}
