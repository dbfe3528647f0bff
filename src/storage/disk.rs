use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};
use uuid::Uuid;

use super::ScreenshotStore;
use crate::error::AppError;
use crate::validation::ProofImage;

pub const SCREENSHOT_DIR: &str = "screenshots";

/// Writes screenshots below `root/screenshots`; the router serves `root` at `/uploads`.
pub struct DiskScreenshotStore {
    root: PathBuf,
    public_base_url: String,
}

impl DiskScreenshotStore {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ScreenshotStore for DiskScreenshotStore {
    async fn store(&self, owner_id: &str, image: ProofImage) -> Result<String, AppError> {
        let dir = self.root.join(SCREENSHOT_DIR);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            error!("Failed to create screenshot directory {:?}: {}", dir, e);
            AppError::Upload(format!("cannot create upload directory: {}", e))
        })?;

        // owner ids come from the identity provider; keep the filename path-safe
        let owner: String = owner_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        let file_name = format!("{}-{}.{}", owner, Uuid::new_v4(), image.extension);
        let path = dir.join(&file_name);

        let mut file = tokio::fs::File::create(&path).await.map_err(|e| {
            error!("Failed to create file {:?}: {}", path, e);
            AppError::Upload(format!("cannot create file: {}", e))
        })?;
        file.write_all(&image.bytes).await.map_err(|e| {
            error!("Failed to write file {:?}: {}", path, e);
            AppError::Upload(format!("cannot write file: {}", e))
        })?;
        file.flush()
            .await
            .map_err(|e| AppError::Upload(format!("cannot flush file: {}", e)))?;

        let url = format!(
            "{}/uploads/{}/{}",
            self.public_base_url, SCREENSHOT_DIR, file_name
        );
        info!("Stored screenshot for {} ({} bytes) at {}", owner_id, image.bytes.len(), url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskScreenshotStore::new(dir.path().to_path_buf(), "http://localhost:3000/".into());

        let image = ProofImage {
            bytes: vec![1, 2, 3],
            content_type: "image/png".to_string(),
            extension: "png",
            file_name: None,
        };
        let url = store.store("uid/../42", image).await.unwrap();

        assert!(url.starts_with("http://localhost:3000/uploads/screenshots/uid42-"));
        assert!(url.ends_with(".png"));

        let file_name = url.rsplit('/').next().unwrap();
        let written = std::fs::read(dir.path().join(SCREENSHOT_DIR).join(file_name)).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }
}
