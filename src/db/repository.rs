use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Course, CourseRow, NewSuggestionRequest, Registration, RegistrationRow, Student, Suggestion,
};

const COURSE_COLUMNS: &str = "id, name, description, instructor, base_price, early_bird_price, \
    special_offer_price, early_bird_slots, total_slots, thumbnail, whatsapp_link, highlights, \
    offer_text, updated_at";

const REGISTRATION_COLUMNS: &str = "id, student_id, course_id, course_name, name, email, phone, \
    college, screenshot_url, price_offered, amount_paid, payment_option, payment_status, \
    confirmed, registered_at, confirmed_at";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn encode_highlights(highlights: &[String]) -> Result<String, AppError> {
    serde_json::to_string(highlights)
        .map_err(|e| AppError::BadRequest(format!("invalid highlights: {}", e)))
}

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, AppError> {
    let rows = sqlx::query_as::<_, CourseRow>(&format!(
        "SELECT {} FROM courses ORDER BY name ASC",
        COURSE_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    rows.into_iter().map(Course::try_from).collect()
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, AppError> {
    let row = sqlx::query_as::<_, CourseRow>(&format!(
        "SELECT {} FROM courses WHERE id = ?",
        COURSE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    row.map(Course::try_from).transpose()
}

pub async fn insert_course(db: &SqlitePool, course: &Course) -> Result<(), AppError> {
    let highlights = encode_highlights(&course.highlights)?;

    sqlx::query(
        r#"
        INSERT INTO courses
            (id, name, description, instructor, base_price, early_bird_price,
            special_offer_price, early_bird_slots, total_slots, thumbnail,
            whatsapp_link, highlights, offer_text, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )
    .bind(&course.id)
    .bind(&course.name)
    .bind(&course.description)
    .bind(&course.instructor)
    .bind(course.base_price)
    .bind(course.early_bird_price)
    .bind(course.special_offer_price)
    .bind(course.early_bird_slots)
    .bind(course.total_slots)
    .bind(&course.thumbnail)
    .bind(&course.whatsapp_link)
    .bind(highlights)
    .bind(&course.offer_text)
    .bind(course.updated_at)
    .execute(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("course '{}' already exists", course.id))
        } else {
            AppError::Database(e)
        }
    })?;

    Ok(())
}

pub async fn update_course(db: &SqlitePool, course: &Course) -> Result<bool, AppError> {
    let highlights = encode_highlights(&course.highlights)?;

    let result = sqlx::query(
        r#"
        UPDATE courses
        SET name = ?1,
            description = ?2,
            instructor = ?3,
            base_price = ?4,
            early_bird_price = ?5,
            special_offer_price = ?6,
            early_bird_slots = ?7,
            total_slots = ?8,
            thumbnail = ?9,
            whatsapp_link = ?10,
            highlights = ?11,
            offer_text = ?12,
            updated_at = ?13
        WHERE id = ?14
        "#,
    )
    .bind(&course.name)
    .bind(&course.description)
    .bind(&course.instructor)
    .bind(course.base_price)
    .bind(course.early_bird_price)
    .bind(course.special_offer_price)
    .bind(course.early_bird_slots)
    .bind(course.total_slots)
    .bind(&course.thumbnail)
    .bind(&course.whatsapp_link)
    .bind(highlights)
    .bind(&course.offer_text)
    .bind(course.updated_at)
    .bind(&course.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn delete_course(db: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn insert_registration(
    conn: &mut SqliteConnection,
    reg: &Registration,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO registrations
            (id, student_id, course_id, course_name, name, email, phone, college,
            screenshot_url, price_offered, amount_paid, payment_option, payment_status,
            confirmed, registered_at, confirmed_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
        "#,
    )
    .bind(&reg.id)
    .bind(&reg.student_id)
    .bind(&reg.course_id)
    .bind(&reg.course_name)
    .bind(&reg.name)
    .bind(&reg.email)
    .bind(&reg.phone)
    .bind(&reg.college)
    .bind(&reg.screenshot_url)
    .bind(reg.price_offered)
    .bind(reg.amount_paid)
    .bind(reg.payment_option.as_str())
    .bind(reg.payment_status.as_str())
    .bind(reg.confirmed)
    .bind(reg.registered_at)
    .bind(reg.confirmed_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("You have already registered for this course".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    Ok(())
}

pub async fn find_registration_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Registration>, AppError> {
    let row = sqlx::query_as::<_, RegistrationRow>(&format!(
        "SELECT {} FROM registrations WHERE id = ?",
        REGISTRATION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    row.map(Registration::try_from).transpose()
}

pub async fn fetch_registrations(db: &SqlitePool) -> Result<Vec<Registration>, AppError> {
    let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
        "SELECT {} FROM registrations ORDER BY registered_at DESC",
        REGISTRATION_COLUMNS
    ))
    .fetch_all(db)
    .await?;

    rows.into_iter().map(Registration::try_from).collect()
}

pub async fn fetch_registrations_for_student(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<Registration>, AppError> {
    let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
        "SELECT {} FROM registrations WHERE student_id = ? ORDER BY registered_at DESC",
        REGISTRATION_COLUMNS
    ))
    .bind(student_id)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(Registration::try_from).collect()
}

pub async fn count_confirmed_registrations(
    db: &SqlitePool,
    course_id: &str,
) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM registrations WHERE course_id = ? AND confirmed = 1",
    )
    .bind(course_id)
    .fetch_one(db)
    .await?;

    Ok(count)
}

/// Flips `confirmed` once; returns false when the row is missing or already confirmed.
pub async fn confirm_registration(
    db: &SqlitePool,
    id: &str,
    at: DateTime<Utc>,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE registrations SET confirmed = 1, confirmed_at = ?2 WHERE id = ?1 AND confirmed = 0",
    )
    .bind(id)
    .bind(at)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn insert_suggestion(
    db: &SqlitePool,
    req: &NewSuggestionRequest,
) -> Result<Suggestion, AppError> {
    let suggestion = Suggestion {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        mobile: req.mobile.trim().to_string(),
        suggestion: req.suggestion.trim().to_string(),
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO suggestions (id, name, mobile, suggestion, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&suggestion.id)
    .bind(&suggestion.name)
    .bind(&suggestion.mobile)
    .bind(&suggestion.suggestion)
    .bind(suggestion.created_at)
    .execute(db)
    .await?;

    Ok(suggestion)
}

pub async fn fetch_suggestions(db: &SqlitePool) -> Result<Vec<Suggestion>, AppError> {
    let suggestions = sqlx::query_as::<_, Suggestion>(
        "SELECT id, name, mobile, suggestion, created_at FROM suggestions ORDER BY created_at DESC",
    )
    .fetch_all(db)
    .await?;

    Ok(suggestions)
}

/// Merge: blank incoming fields keep what is already stored.
pub async fn upsert_student(
    conn: &mut SqliteConnection,
    id: &str,
    phone: &str,
    name: &str,
    email: &str,
    college: &str,
) -> Result<(), AppError> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO students (id, phone, name, email, college, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        ON CONFLICT(id) DO UPDATE SET
            phone = CASE WHEN excluded.phone <> '' THEN excluded.phone ELSE students.phone END,
            name = CASE WHEN excluded.name <> '' THEN excluded.name ELSE students.name END,
            email = CASE WHEN excluded.email <> '' THEN excluded.email ELSE students.email END,
            college = CASE WHEN excluded.college <> '' THEN excluded.college ELSE students.college END,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(id)
    .bind(phone)
    .bind(name)
    .bind(email)
    .bind(college)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn find_student(db: &SqlitePool, id: &str) -> Result<Option<Student>, AppError> {
    let student = sqlx::query_as::<_, Student>(
        "SELECT id, phone, name, email, college, created_at, updated_at FROM students WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(student)
}
