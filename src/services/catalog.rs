use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository;
use crate::error::AppError;
use crate::events::{CatalogEvent, CatalogEvents};
use crate::models::course::{clean_highlights, non_blank};
use crate::models::{Course, CourseView, NewCourseRequest, UpdateCourseRequest};
use crate::validation;

/// Path ids are matched the way course codes are stored.
fn course_key(id: &str) -> String {
    id.trim().to_lowercase()
}

pub struct CatalogService {
    db: SqlitePool,
    events: CatalogEvents,
}

impl CatalogService {
    pub fn new(db: SqlitePool, events: CatalogEvents) -> Self {
        Self { db, events }
    }

    pub async fn list(&self) -> Result<Vec<CourseView>, AppError> {
        let courses = repository::fetch_courses(&self.db).await?;
        Ok(courses.into_iter().map(CourseView::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<CourseView, AppError> {
        let course = repository::find_course_by_id(&self.db, &course_key(id))
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(CourseView::from(course))
    }

    pub async fn create(&self, req: NewCourseRequest) -> Result<CourseView, AppError> {
        let id = validation::course_id_from_code(&req.course_code)?;

        let course = Course {
            id,
            name: req.name.trim().to_string(),
            description: req.description.trim().to_string(),
            instructor: req.instructor.trim().to_string(),
            base_price: req.base_price,
            early_bird_price: req.early_bird_price.filter(|p| *p > 0),
            special_offer_price: req.special_offer_price.filter(|p| *p > 0),
            early_bird_slots: req.early_bird_slots,
            total_slots: req.total_slots,
            thumbnail: req.thumbnail.and_then(non_blank),
            whatsapp_link: req.whatsapp_link.and_then(non_blank),
            highlights: clean_highlights(req.highlights),
            offer_text: req.offer_text.and_then(non_blank),
            updated_at: Utc::now(),
        };
        validation::validate_course(&course)?;

        if repository::find_course_by_id(&self.db, &course.id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A course with code '{}' already exists",
                course.id.to_uppercase()
            )));
        }
        repository::insert_course(&self.db, &course).await?;
        info!("Course {} added", course.id);

        let view = CourseView::from(course);
        self.events.publish(CatalogEvent::CourseUpserted { course: view.clone() });
        Ok(view)
    }

    pub async fn update(&self, id: &str, req: UpdateCourseRequest) -> Result<CourseView, AppError> {
        let mut course = repository::find_course_by_id(&self.db, &course_key(id))
            .await?
            .ok_or(AppError::NotFound)?;

        req.apply_to(&mut course);
        course.updated_at = Utc::now();
        validation::validate_course(&course)?;

        if !repository::update_course(&self.db, &course).await? {
            return Err(AppError::NotFound);
        }
        info!("Course {} updated", course.id);

        let view = CourseView::from(course);
        self.events.publish(CatalogEvent::CourseUpserted { course: view.clone() });
        Ok(view)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let id = course_key(id);
        if !repository::delete_course(&self.db, &id).await? {
            return Err(AppError::NotFound);
        }
        info!("Course {} deleted", id);
        self.events.publish(CatalogEvent::CourseDeleted { id });
        Ok(())
    }
}
