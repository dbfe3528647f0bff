use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOption {
    Full,
    #[serde(alias = "lock")]
    SeatLock,
}

impl PaymentOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOption::Full => "full",
            PaymentOption::SeatLock => "seat_lock",
        }
    }
}

impl FromStr for PaymentOption {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(PaymentOption::Full),
            "seat_lock" | "lock" => Ok(PaymentOption::SeatLock),
            other => Err(AppError::MalformedRecord(format!(
                "unknown payment option '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    SeatLockPending,
    #[serde(alias = "full_payment_received")]
    FullPaymentPending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::SeatLockPending => "seat_lock_pending",
            PaymentStatus::FullPaymentPending => "full_payment_pending",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seat_lock_pending" => Ok(PaymentStatus::SeatLockPending),
            // older records used "received" for the same state
            "full_payment_pending" | "full_payment_received" => {
                Ok(PaymentStatus::FullPaymentPending)
            }
            other => Err(AppError::MalformedRecord(format!(
                "unknown payment status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub course_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub screenshot_url: String,
    pub price_offered: i64,
    pub amount_paid: i64,
    pub payment_option: PaymentOption,
    pub payment_status: PaymentStatus,
    pub confirmed: bool,
    pub registered_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Registration {
    /// One registration per student and course.
    pub fn document_id(student_id: &str, course_id: &str) -> String {
        format!("{}_{}", student_id, course_id)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub course_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub screenshot_url: String,
    pub price_offered: i64,
    pub amount_paid: i64,
    pub payment_option: String,
    pub payment_status: String,
    pub confirmed: bool,
    pub registered_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = AppError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        if row.student_id.is_empty() || row.course_id.is_empty() {
            return Err(AppError::MalformedRecord(format!(
                "registration '{}' has no student or course",
                row.id
            )));
        }
        if row.screenshot_url.is_empty() {
            return Err(AppError::MalformedRecord(format!(
                "registration '{}' has no payment screenshot",
                row.id
            )));
        }

        Ok(Registration {
            payment_option: row.payment_option.parse()?,
            payment_status: row.payment_status.parse()?,
            id: row.id,
            student_id: row.student_id,
            course_id: row.course_id,
            course_name: row.course_name,
            name: row.name,
            email: row.email,
            phone: row.phone,
            college: row.college,
            screenshot_url: row.screenshot_url,
            price_offered: row.price_offered,
            amount_paid: row.amount_paid,
            confirmed: row.confirmed,
            registered_at: row.registered_at,
            confirmed_at: row.confirmed_at,
        })
    }
}

/// Screenshot as sent by the client: base64 body plus its declared MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotPayload {
    pub data: String,
    pub content_type: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRegistrationRequest {
    pub course_id: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "Full name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[validate(custom(function = "crate::validation::not_blank", message = "College is required"))]
    pub college: String,
    pub payment_option: PaymentOption,
    #[serde(default)]
    pub screenshot: Option<ScreenshotPayload>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationFilter {
    #[default]
    All,
    Confirmed,
    Pending,
}

impl RegistrationFilter {
    pub fn matches(&self, registration: &Registration) -> bool {
        match self {
            RegistrationFilter::All => true,
            RegistrationFilter::Confirmed => registration.confirmed,
            RegistrationFilter::Pending => !registration.confirmed,
        }
    }
}

/// What a student sees for one of their registrations.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationStatusView {
    pub id: String,
    pub course_id: String,
    pub course_name: String,
    pub payment_option: PaymentOption,
    pub payment_status: PaymentStatus,
    pub confirmed: bool,
    pub status_label: &'static str,
    pub price_offered: i64,
    pub amount_paid: i64,
    pub balance_due: i64,
    pub whatsapp_link: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_received_status_reads_as_pending() {
        let status: PaymentStatus = "full_payment_received".parse().unwrap();
        assert_eq!(status, PaymentStatus::FullPaymentPending);
        assert_eq!(status.as_str(), "full_payment_pending");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("paid".parse::<PaymentStatus>().is_err());
        assert!("installments".parse::<PaymentOption>().is_err());
    }

    #[test]
    fn document_id_is_student_then_course() {
        assert_eq!(Registration::document_id("uid42", "ucm"), "uid42_ucm");
    }
}
