pub mod contact;
pub mod rating;
pub mod resume;
pub mod settings;
pub mod sqlx_repo;
pub mod token;
pub mod upload;
pub mod user;
