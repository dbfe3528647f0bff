use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};
use validator::Validate;

use crate::auth::Session;
use crate::db::repository;
use crate::error::AppError;
use crate::lifecycle::{self, SEAT_LOCK_AMOUNT};
use crate::models::{
    NewRegistrationRequest, PaymentOption, Registration, RegistrationStatusView, StudentDashboard,
};
use crate::pricing::{self, BUNDLE_COURSE_ID, BUNDLE_COURSE_NAME};
use crate::storage::ScreenshotStore;
use crate::validation;

/// What the student is asked to pay before submitting.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub course_id: String,
    pub course_name: String,
    pub price_to_pay: i64,
    pub seat_lock_amount: Option<i64>,
    pub upi_id: Option<String>,
}

struct Offer {
    course_id: String,
    course_name: String,
    price: i64,
}

pub struct RegistrationService {
    db: SqlitePool,
    screenshots: Arc<dyn ScreenshotStore>,
    upi_id: Option<String>,
    bundle_whatsapp_link: Option<String>,
}

impl RegistrationService {
    pub fn new(
        db: SqlitePool,
        screenshots: Arc<dyn ScreenshotStore>,
        upi_id: Option<String>,
        bundle_whatsapp_link: Option<String>,
    ) -> Self {
        Self {
            db,
            screenshots,
            upi_id: upi_id.filter(|u| !u.is_empty()),
            bundle_whatsapp_link,
        }
    }

    async fn offer(&self, course_id: &str) -> Result<Offer, AppError> {
        let course_id = course_id.trim().to_lowercase();
        if course_id == BUNDLE_COURSE_ID {
            let confirmed =
                repository::count_confirmed_registrations(&self.db, BUNDLE_COURSE_ID).await?;
            return Ok(Offer {
                course_id,
                course_name: BUNDLE_COURSE_NAME.to_string(),
                price: pricing::bundle_price(confirmed),
            });
        }

        let course = repository::find_course_by_id(&self.db, &course_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let price = pricing::resolve(&course).effective_price.ok_or_else(|| {
            AppError::Validation(format!("Course '{}' has no price set", course.id))
        })?;

        Ok(Offer {
            course_id: course.id,
            course_name: course.name,
            price,
        })
    }

    pub async fn quote(&self, course_id: &str) -> Result<Quote, AppError> {
        let offer = self.offer(course_id).await?;
        let seat_lock_amount = if offer.course_id == BUNDLE_COURSE_ID {
            None
        } else {
            Some(SEAT_LOCK_AMOUNT)
        };
        Ok(Quote {
            course_id: offer.course_id,
            course_name: offer.course_name,
            price_to_pay: offer.price,
            seat_lock_amount,
            upi_id: self.upi_id.clone(),
        })
    }

    pub async fn submit(
        &self,
        session: &Session,
        mut req: NewRegistrationRequest,
    ) -> Result<Registration, AppError> {
        // Everything the student typed is checked before the store or uploader is touched.
        req.email = req.email.trim().to_string();
        req.validate()?;
        // a phone-verified session pins the number
        let phone = match session.local_phone() {
            Some(verified) => verified,
            None => req.phone.clone(),
        };
        let phone = validation::normalize_phone(&phone)?;
        let image = validation::decode_screenshot(req.screenshot.as_ref())?;

        let offer = self.offer(&req.course_id).await?;
        if offer.course_id == BUNDLE_COURSE_ID && req.payment_option != PaymentOption::Full {
            return Err(AppError::Validation(
                "The course bundle can only be paid in full".to_string(),
            ));
        }

        let id = Registration::document_id(session.uid(), &offer.course_id);
        if repository::find_registration_by_id(&self.db, &id).await?.is_some() {
            return Err(AppError::Conflict(
                "You have already registered for this course".to_string(),
            ));
        }

        let screenshot_url = self.screenshots.store(session.uid(), image).await?;

        let plan = lifecycle::plan_payment(req.payment_option, offer.price);
        let registration = Registration {
            id,
            student_id: session.uid().to_string(),
            course_id: offer.course_id,
            course_name: offer.course_name,
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            phone,
            college: req.college.trim().to_string(),
            screenshot_url,
            price_offered: plan.price_offered,
            amount_paid: plan.amount_paid,
            payment_option: req.payment_option,
            payment_status: plan.payment_status,
            confirmed: false,
            registered_at: Utc::now(),
            confirmed_at: None,
        };

        if let Err(e) = self.persist(&registration).await {
            warn!(
                "Registration {} not stored, screenshot {} is orphaned: {}",
                registration.id, registration.screenshot_url, e
            );
            return Err(e);
        }

        info!(
            "Registration {} submitted: {} paid {} of {}",
            registration.id,
            registration.payment_status,
            registration.amount_paid,
            registration.price_offered
        );
        Ok(registration)
    }

    /// Registration row and student profile commit together or not at all.
    async fn persist(&self, registration: &Registration) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;
        repository::insert_registration(&mut *tx, registration).await?;
        repository::upsert_student(
            &mut *tx,
            &registration.student_id,
            &registration.phone,
            &registration.name,
            &registration.email,
            &registration.college,
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn dashboard(&self, session: &Session) -> Result<StudentDashboard, AppError> {
        let student = repository::find_student(&self.db, session.uid()).await?;
        let registrations =
            repository::fetch_registrations_for_student(&self.db, session.uid()).await?;

        let mut views = Vec::with_capacity(registrations.len());
        for reg in registrations {
            let (course_name, whatsapp_link) = if reg.course_id == BUNDLE_COURSE_ID {
                (BUNDLE_COURSE_NAME.to_string(), self.bundle_whatsapp_link.clone())
            } else {
                match repository::find_course_by_id(&self.db, &reg.course_id).await? {
                    Some(course) => (course.name, course.whatsapp_link),
                    None => (reg.course_name.clone(), None),
                }
            };

            views.push(RegistrationStatusView {
                status_label: lifecycle::status_label(&reg),
                balance_due: lifecycle::balance_due(&reg),
                // group link only after confirmation
                whatsapp_link: if reg.confirmed { whatsapp_link } else { None },
                id: reg.id,
                course_id: reg.course_id,
                course_name,
                payment_option: reg.payment_option,
                payment_status: reg.payment_status,
                confirmed: reg.confirmed,
                price_offered: reg.price_offered,
                amount_paid: reg.amount_paid,
                registered_at: reg.registered_at,
            });
        }

        Ok(StudentDashboard {
            student,
            registrations: views,
        })
    }
}
