pub mod app_error;
pub mod notifier;
pub mod templates;
pub mod use_cases;
pub mod validators;
