pub mod app_settings;
pub mod contact;
pub mod rating;
pub mod resume;
pub mod token;
pub mod upload;
pub mod user;
