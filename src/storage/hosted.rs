use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{error, info};

use super::{ScreenshotStore, dto};
use crate::error::AppError;
use crate::validation::ProofImage;

/// Unsigned uploads to a hosted image service using a public upload preset.
pub struct HostedImageStore {
    client: Client,
    upload_url: String,
    upload_preset: String,
}

impl HostedImageStore {
    pub fn new(upload_url: String, upload_preset: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            upload_url,
            upload_preset,
        })
    }
}

#[async_trait]
impl ScreenshotStore for HostedImageStore {
    async fn store(&self, owner_id: &str, image: ProofImage) -> Result<String, AppError> {
        let file_name = image
            .file_name
            .clone()
            .unwrap_or_else(|| format!("{}.{}", owner_id, image.extension));
        let size = image.bytes.len();

        let part = Part::bytes(image.bytes)
            .file_name(file_name)
            .mime_str(&image.content_type)
            .map_err(|e| AppError::Upload(format!("invalid content type: {}", e)))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("request failed: {}", e)))?;

        let status = response.status();
        let body_text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<dto::UploadErrorResponse>(&body_text)
                .map(|e| e.error.message)
                .unwrap_or(body_text);
            error!("Image host returned {}: {}", status, message);
            return Err(AppError::Upload(format!("image host error {}: {}", status, message)));
        }

        let parsed: dto::UploadResponse = serde_json::from_str(&body_text)
            .map_err(|e| AppError::Upload(format!("failed to parse upload response: {}", e)))?;

        let url = parsed
            .secure_url
            .or(parsed.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::Upload("image host did not return a URL".to_string()))?;

        info!(
            "Uploaded screenshot for {} ({} bytes, id {:?})",
            owner_id, size, parsed.public_id
        );
        Ok(url)
    }
}
