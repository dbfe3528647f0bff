use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::lifecycle;
use crate::models::{Registration, RegistrationFilter};

pub struct AdminService {
    db: SqlitePool,
}

impl AdminService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Search matches the student's name (case-insensitive) or phone.
    pub async fn registrations(
        &self,
        filter: RegistrationFilter,
        search: &str,
    ) -> Result<Vec<Registration>, AppError> {
        let needle = search.trim().to_lowercase();
        let registrations = repository::fetch_registrations(&self.db).await?;

        Ok(registrations
            .into_iter()
            .filter(|r| filter.matches(r))
            .filter(|r| {
                needle.is_empty()
                    || r.name.to_lowercase().contains(&needle)
                    || r.phone.contains(&needle)
            })
            .collect())
    }

    pub async fn confirm(&self, id: &str, admin_uid: &str) -> Result<Registration, AppError> {
        let mut registration = repository::find_registration_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        lifecycle::confirm(&mut registration, now)?;

        if !repository::confirm_registration(&self.db, id, now).await? {
            // lost a race with another admin
            return Err(AppError::Conflict(format!(
                "registration '{}' is already confirmed",
                id
            )));
        }

        info!("Registration {} confirmed by {}", id, admin_uid);
        Ok(registration)
    }
}
