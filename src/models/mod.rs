pub mod course;
pub mod registration;
pub mod student;
pub mod suggestion;

pub use course::{Course, CourseRow, CourseView, NewCourseRequest, UpdateCourseRequest};
pub use registration::{
    NewRegistrationRequest, PaymentOption, PaymentStatus, Registration, RegistrationFilter,
    RegistrationRow, RegistrationStatusView, ScreenshotPayload,
};
pub use student::{Student, StudentDashboard};
pub use suggestion::{NewSuggestionRequest, Suggestion};
