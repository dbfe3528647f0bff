use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: String,
    pub phone: String,
    pub name: String,
    pub email: String,
    pub college: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub student: Option<Student>,
    pub registrations: Vec<super::RegistrationStatusView>,
}
