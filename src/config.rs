use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Where payment screenshots end up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenshotBackend {
    Disk,
    Hosted { upload_url: String, upload_preset: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Empty means any verified email may use the admin console.
    pub admin_emails: Vec<String>,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub screenshot_backend: ScreenshotBackend,
    pub upi_id: String,
    pub bundle_whatsapp_link: Option<String>,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://coursedesk.db?mode=rwc".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::Config("JWT_SECRET is not set".to_string()))?;

        let admin_emails = env::var("ADMIN_EMAILS")
            .map(|raw| parse_email_list(&raw))
            .unwrap_or_default();

        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}", bind_addr))
            .trim_end_matches('/')
            .to_string();

        let screenshot_backend = match env::var("SCREENSHOT_BACKEND").as_deref() {
            Ok("hosted") => {
                let upload_url = env::var("IMAGE_UPLOAD_URL").map_err(|_| {
                    AppError::Config("IMAGE_UPLOAD_URL is not set".to_string())
                })?;
                let upload_preset = env::var("IMAGE_UPLOAD_PRESET").map_err(|_| {
                    AppError::Config("IMAGE_UPLOAD_PRESET is not set".to_string())
                })?;
                ScreenshotBackend::Hosted { upload_url, upload_preset }
            }
            Ok("disk") | Err(_) => ScreenshotBackend::Disk,
            Ok(other) => {
                return Err(AppError::Config(format!(
                    "SCREENSHOT_BACKEND must be 'disk' or 'hosted', got '{}'",
                    other
                )));
            }
        };

        let upi_id = env::var("UPI_ID").unwrap_or_default();
        let bundle_whatsapp_link = env::var("BUNDLE_WHATSAPP_LINK")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            admin_emails,
            upload_dir,
            public_base_url,
            screenshot_backend,
            upi_id,
            bundle_whatsapp_link,
        })
    }
}

fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
