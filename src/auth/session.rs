use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use super::Identity;
use crate::error::AppError;
use crate::state::AppState;

pub const STUDENT_LOGIN_PATH: &str = "/student-login";
pub const ADMIN_LOGIN_PATH: &str = "/admin-login";

/// The caller's session, handed to handlers explicitly instead of living in ambient storage.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
}

impl Session {
    pub fn uid(&self) -> &str {
        &self.identity.uid
    }

    /// Phone number from the identity provider without the +91 prefix.
    pub fn local_phone(&self) -> Option<String> {
        self.identity.phone_number.as_deref().map(|p| {
            p.strip_prefix("+91").unwrap_or(p).to_string()
        })
    }
}

#[derive(Debug, Clone)]
pub struct StudentSession(pub Session);

#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

/// Login route carrying where to come back to. Only local paths survive as `next`.
pub fn login_path(login: &str, next: &str) -> String {
    let is_local = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
    if is_local && next != login {
        format!("{}?next={}", login, next)
    } else {
        login.to_string()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn resolve_session(parts: &Parts, state: &AppState) -> Result<Option<Session>, AppError> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };
    let identity = state.identity.verify(token).await?;
    Ok(identity.map(|identity| Session { identity }))
}

impl FromRequestParts<AppState> for StudentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_session(parts, state).await? {
            Some(session) => Ok(StudentSession(session)),
            None => Err(AppError::Unauthorized {
                login_path: login_path(STUDENT_LOGIN_PATH, parts.uri.path()),
            }),
        }
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let next = parts.uri.path();
        let session = resolve_session(parts, state).await?.ok_or_else(|| AppError::Unauthorized {
            login_path: login_path(ADMIN_LOGIN_PATH, next),
        })?;

        let email = match (&session.identity.email, session.identity.email_verified) {
            (Some(email), true) => email.clone(),
            _ => {
                return Err(AppError::Forbidden {
                    login_path: login_path(ADMIN_LOGIN_PATH, next),
                });
            }
        };

        let allowed = &state.config.admin_emails;
        if !allowed.is_empty() && !allowed.iter().any(|a| *a == email) {
            tracing::warn!("admin access denied for {}", email);
            return Err(AppError::Forbidden {
                login_path: login_path(ADMIN_LOGIN_PATH, next),
            });
        }

        Ok(AdminSession(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_paths_become_next_parameter() {
        assert_eq!(
            login_path(STUDENT_LOGIN_PATH, "/registrations"),
            "/student-login?next=/registrations"
        );
    }

    #[test]
    fn foreign_or_looping_paths_are_dropped() {
        assert_eq!(login_path(STUDENT_LOGIN_PATH, "//evil.example"), "/student-login");
        assert_eq!(login_path(STUDENT_LOGIN_PATH, "https://evil.example"), "/student-login");
        assert_eq!(login_path(ADMIN_LOGIN_PATH, ADMIN_LOGIN_PATH), "/admin-login");
    }

    #[test]
    fn phone_prefix_is_stripped() {
        let session = Session {
            identity: Identity {
                uid: "u".into(),
                phone_number: Some("+919876543210".into()),
                email: None,
                email_verified: false,
            },
        };
        assert_eq!(session.local_phone().as_deref(), Some("9876543210"));
    }
}
