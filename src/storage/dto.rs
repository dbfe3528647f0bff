use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub secure_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadErrorResponse {
    pub error: UploadErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct UploadErrorBody {
    pub message: String,
}
