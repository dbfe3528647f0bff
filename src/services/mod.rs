pub mod admin;
pub mod catalog;
pub mod registration;

pub use admin::AdminService;
pub use catalog::CatalogService;
pub use registration::{Quote, RegistrationService};
