//! Input checks that run before anything is uploaded or written.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use validator::ValidationError;

use crate::error::AppError;
use crate::models::{Course, ScreenshotPayload};

pub const MAX_SCREENSHOT_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// A decoded payment screenshot ready for storage.
#[derive(Debug, Clone)]
pub struct ProofImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: &'static str,
    pub file_name: Option<String>,
}

fn required(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Field check for request structs deriving `Validate`.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Turns an admin-entered course code into the course id.
///
/// Registration ids join student and course with `_`, so course ids never contain one.
pub fn course_id_from_code(code: &str) -> Result<String, AppError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::Validation("Course code is required".to_string()));
    }
    if code.contains('/') {
        return Err(AppError::Validation(
            "Course code cannot contain a forward slash (\"/\")".to_string(),
        ));
    }
    if code.contains('_') {
        return Err(AppError::Validation(
            "Course code cannot contain an underscore (\"_\")".to_string(),
        ));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "Course code cannot contain spaces".to_string(),
        ));
    }
    let id = code.to_lowercase();
    if id == crate::pricing::BUNDLE_COURSE_ID {
        return Err(AppError::Validation(format!(
            "Course code '{}' is reserved",
            code
        )));
    }
    Ok(id)
}

pub fn validate_course(course: &Course) -> Result<(), AppError> {
    required(&course.name, "Course name")?;
    required(&course.description, "Description")?;
    required(&course.instructor, "Instructor")?;

    if course.base_price <= 0 {
        return Err(AppError::Validation(
            "Base price must be greater than zero".to_string(),
        ));
    }
    for (label, price) in [
        ("Early bird price", course.early_bird_price),
        ("Special offer price", course.special_offer_price),
    ] {
        if let Some(price) = price {
            if price < 0 {
                return Err(AppError::Validation(format!("{} cannot be negative", label)));
            }
            if price > course.base_price {
                return Err(AppError::Validation(format!(
                    "{} cannot exceed the base price",
                    label
                )));
            }
        }
    }
    if course.early_bird_slots < 0 || course.total_slots < 0 {
        return Err(AppError::Validation("Slots cannot be negative".to_string()));
    }
    if course.total_slots > 0 && course.early_bird_slots > course.total_slots {
        return Err(AppError::Validation(
            "Early bird slots cannot exceed total slots".to_string(),
        ));
    }
    Ok(())
}

/// Accepts a bare 10-digit number or one prefixed with +91.
pub fn normalize_phone(phone: &str) -> Result<String, AppError> {
    let trimmed = phone.trim();
    let digits = trimmed.strip_prefix("+91").unwrap_or(trimmed);
    if digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(digits.to_string())
    } else {
        Err(AppError::Validation(
            "Please enter a valid 10-digit phone number".to_string(),
        ))
    }
}

pub fn decode_screenshot(payload: Option<&ScreenshotPayload>) -> Result<ProofImage, AppError> {
    let payload = payload.ok_or_else(|| {
        AppError::Validation("Please upload a screenshot of your payment".to_string())
    })?;

    let content_type = payload.content_type.trim().to_lowercase();
    let extension = ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported screenshot type '{}'; use JPEG, PNG or WebP",
                payload.content_type
            ))
        })?;

    // Accept data URLs as well as bare base64.
    let encoded = match payload.data.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => payload.data.as_str(),
    };
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::Validation("Screenshot is not valid base64".to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::Validation(
            "Please upload a screenshot of your payment".to_string(),
        ));
    }
    if bytes.len() > MAX_SCREENSHOT_BYTES {
        return Err(AppError::Validation(format!(
            "Screenshot is larger than {} MB",
            MAX_SCREENSHOT_BYTES / (1024 * 1024)
        )));
    }

    Ok(ProofImage {
        bytes,
        content_type: if content_type == "image/jpg" {
            "image/jpeg".to_string()
        } else {
            content_type
        },
        extension,
        file_name: payload.file_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;
    use crate::models::{NewRegistrationRequest, NewSuggestionRequest, PaymentOption};

    fn payload(data: &str, content_type: &str) -> ScreenshotPayload {
        ScreenshotPayload {
            data: data.to_string(),
            content_type: content_type.to_string(),
            file_name: None,
        }
    }

    #[test]
    fn any_slash_in_course_code_is_rejected() {
        for code in ["UCM/2", "/", "a/b/c", "/lead", "trail/"] {
            assert!(
                matches!(course_id_from_code(code), Err(AppError::Validation(_))),
                "{} should be rejected",
                code
            );
        }
    }

    #[test]
    fn course_code_is_lowercased() {
        assert_eq!(course_id_from_code(" UCM ").unwrap(), "ucm");
        assert!(course_id_from_code("").is_err());
        assert!(course_id_from_code("Bundle").is_err());
        assert!(course_id_from_code("U CM").is_err());
    }

    #[test]
    fn phone_numbers() {
        assert_eq!(normalize_phone("9876543210").unwrap(), "9876543210");
        assert_eq!(normalize_phone("+919876543210").unwrap(), "9876543210");
        assert!(normalize_phone("98765").is_err());
        assert!(normalize_phone("98765abcde").is_err());
    }

    fn registration(name: &str, email: &str, college: &str) -> NewRegistrationRequest {
        NewRegistrationRequest {
            course_id: "ucm".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: String::new(),
            college: college.to_string(),
            payment_option: PaymentOption::Full,
            screenshot: None,
        }
    }

    #[test]
    fn malformed_emails_are_rejected() {
        assert!(registration("Asha", "a@b.co", "ISM").validate().is_ok());
        for email in ["nope", "@b.co", "a@@b.co", "a b@c.d", "a@b..co", "a@b.c@d.e", ""] {
            let err = registration("Asha", email, "ISM").validate().unwrap_err();
            assert!(err.field_errors().contains_key("email"), "{} should be rejected", email);
        }
    }

    #[test]
    fn blank_contact_fields_are_rejected() {
        let err = registration("   ", "a@b.co", "").validate().unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("college"));

        let app_err = AppError::from(err);
        assert!(matches!(app_err, AppError::Validation(msg) if msg.contains("Full name is required")));
    }

    #[test]
    fn suggestions_need_every_field() {
        let blank = NewSuggestionRequest {
            name: "Ravi".to_string(),
            mobile: " ".to_string(),
            suggestion: "More mine surveying".to_string(),
        };
        assert!(blank.validate().is_err());

        let ok = NewSuggestionRequest {
            mobile: "9876543210".to_string(),
            ..blank
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn underscore_in_course_code_is_rejected() {
        assert!(matches!(course_id_from_code("x_y"), Err(AppError::Validation(_))));
        assert!(matches!(course_id_from_code("_"), Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_screenshot_is_a_validation_error() {
        assert!(matches!(decode_screenshot(None), Err(AppError::Validation(_))));
    }

    #[test]
    fn screenshot_type_and_encoding_are_checked() {
        let png = STANDARD.encode([0x89, b'P', b'N', b'G']);
        let image = decode_screenshot(Some(&payload(&png, "image/png"))).unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(image.bytes.len(), 4);

        let data_url = format!("data:image/jpeg;base64,{}", png);
        let image = decode_screenshot(Some(&payload(&data_url, "image/jpg"))).unwrap();
        assert_eq!(image.content_type, "image/jpeg");

        assert!(decode_screenshot(Some(&payload(&png, "application/pdf"))).is_err());
        assert!(decode_screenshot(Some(&payload("***", "image/png"))).is_err());
        assert!(decode_screenshot(Some(&payload("", "image/png"))).is_err());
    }

    #[test]
    fn oversized_screenshot_is_rejected() {
        let big = STANDARD.encode(vec![0u8; MAX_SCREENSHOT_BYTES + 1]);
        assert!(decode_screenshot(Some(&payload(&big, "image/png"))).is_err());
    }
}
