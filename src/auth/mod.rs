pub mod session;

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

pub use session::{AdminSession, Session, StudentSession};

/// Who the identity provider says is calling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
}

/// Token claims issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub exp: usize,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns `None` when the token is not a valid session.
    async fn verify(&self, token: &str) -> Result<Option<Identity>, AppError>;
}

/// Verifies HS256 bearer tokens signed with a shared secret.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, AppError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => {
                let claims = data.claims;
                if claims.sub.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Identity {
                    uid: claims.sub,
                    phone_number: claims.phone_number,
                    email: claims.email.map(|e| e.to_lowercase()),
                    email_verified: claims.email_verified,
                }))
            }
            Err(e) => {
                debug!("rejected bearer token: {}", e);
                Ok(None)
            }
        }
    }
}

pub fn issue_token(secret: &str, claims: &Claims) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Config(format!("failed to sign token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, exp_offset_secs: i64) -> Claims {
        Claims {
            sub: sub.to_string(),
            phone_number: Some("+919876543210".to_string()),
            email: Some("Admin@Example.com".to_string()),
            email_verified: true,
            exp: (chrono::Utc::now().timestamp() + exp_offset_secs) as usize,
        }
    }

    #[tokio::test]
    async fn valid_token_yields_identity() {
        let token = issue_token("secret", &claims("uid-1", 3600)).unwrap();
        let identity = JwtIdentityProvider::new("secret")
            .verify(&token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.uid, "uid-1");
        assert_eq!(identity.email.as_deref(), Some("admin@example.com"));
        assert!(identity.email_verified);
    }

    #[tokio::test]
    async fn wrong_secret_or_expired_token_is_no_session() {
        let token = issue_token("secret", &claims("uid-1", 3600)).unwrap();
        assert!(JwtIdentityProvider::new("other").verify(&token).await.unwrap().is_none());

        let expired = issue_token("secret", &claims("uid-1", -3600)).unwrap();
        assert!(JwtIdentityProvider::new("secret").verify(&expired).await.unwrap().is_none());
    }
}
