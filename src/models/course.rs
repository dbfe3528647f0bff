use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::pricing::{self, ResolvedPrice};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub description: String,
    pub instructor: String,
    pub base_price: i64,
    pub early_bird_price: Option<i64>,
    pub special_offer_price: Option<i64>,
    pub early_bird_slots: i64,
    pub total_slots: i64,
    pub thumbnail: Option<String>,
    pub whatsapp_link: Option<String>,
    pub highlights: Vec<String>,
    pub offer_text: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Storage shape of a course; highlights are kept as a JSON array.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub instructor: String,
    pub base_price: i64,
    pub early_bird_price: Option<i64>,
    pub special_offer_price: Option<i64>,
    pub early_bird_slots: i64,
    pub total_slots: i64,
    pub thumbnail: Option<String>,
    pub whatsapp_link: Option<String>,
    pub highlights: String,
    pub offer_text: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = AppError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        if row.id.is_empty() || row.name.trim().is_empty() {
            return Err(AppError::MalformedRecord(format!(
                "course '{}' is missing an id or name",
                row.id
            )));
        }
        let highlights: Vec<String> = serde_json::from_str(&row.highlights).map_err(|e| {
            AppError::MalformedRecord(format!("course '{}' highlights: {}", row.id, e))
        })?;

        Ok(Course {
            id: row.id,
            name: row.name,
            description: row.description,
            instructor: row.instructor,
            base_price: row.base_price,
            early_bird_price: row.early_bird_price,
            special_offer_price: row.special_offer_price,
            early_bird_slots: row.early_bird_slots,
            total_slots: row.total_slots,
            thumbnail: row.thumbnail,
            whatsapp_link: row.whatsapp_link,
            highlights,
            offer_text: row.offer_text,
            updated_at: row.updated_at,
        })
    }
}

/// A course as the catalog shows it, with pricing already resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CourseView {
    #[serde(flatten)]
    pub course: Course,
    pub pricing: ResolvedPrice,
}

impl From<Course> for CourseView {
    fn from(course: Course) -> Self {
        let pricing = pricing::resolve(&course);
        Self { course, pricing }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub course_code: String,
    pub name: String,
    pub description: String,
    pub instructor: String,
    pub base_price: i64,
    #[serde(default)]
    pub early_bird_price: Option<i64>,
    #[serde(default)]
    pub special_offer_price: Option<i64>,
    #[serde(default)]
    pub early_bird_slots: i64,
    #[serde(default)]
    pub total_slots: i64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub whatsapp_link: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub offer_text: Option<String>,
}

/// Merge update: only the provided fields change. The id is never editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub base_price: Option<i64>,
    pub early_bird_price: Option<i64>,
    pub special_offer_price: Option<i64>,
    pub early_bird_slots: Option<i64>,
    pub total_slots: Option<i64>,
    pub thumbnail: Option<String>,
    pub whatsapp_link: Option<String>,
    pub highlights: Option<Vec<String>>,
    pub offer_text: Option<String>,
}

impl UpdateCourseRequest {
    pub fn apply_to(self, course: &mut Course) {
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(description) = self.description {
            course.description = description;
        }
        if let Some(instructor) = self.instructor {
            course.instructor = instructor;
        }
        if let Some(base_price) = self.base_price {
            course.base_price = base_price;
        }
        if let Some(price) = self.early_bird_price {
            course.early_bird_price = Some(price).filter(|p| *p > 0);
        }
        if let Some(price) = self.special_offer_price {
            course.special_offer_price = Some(price).filter(|p| *p > 0);
        }
        if let Some(slots) = self.early_bird_slots {
            course.early_bird_slots = slots;
        }
        if let Some(slots) = self.total_slots {
            course.total_slots = slots;
        }
        if let Some(thumbnail) = self.thumbnail {
            course.thumbnail = non_blank(thumbnail);
        }
        if let Some(link) = self.whatsapp_link {
            course.whatsapp_link = non_blank(link);
        }
        if let Some(highlights) = self.highlights {
            course.highlights = clean_highlights(highlights);
        }
        if let Some(offer_text) = self.offer_text {
            course.offer_text = non_blank(offer_text);
        }
    }
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn clean_highlights(highlights: Vec<String>) -> Vec<String> {
    highlights
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect()
}
