pub mod auth;
pub mod extractors;
pub mod meta;
pub mod resume;
pub mod uploads;
