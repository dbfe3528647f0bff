use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub suggestion: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSuggestionRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "Please fill in all fields"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "Please fill in all fields"))]
    pub mobile: String,
    #[validate(
        custom(function = "crate::validation::not_blank", message = "Please fill in all fields"),
        length(max = 2000)
    )]
    pub suggestion: String,
}
