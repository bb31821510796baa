#![allow(dead_code)]

use chrono::Utc;
use uuid::Uuid;

use resumecraft_backend::{
    auth::password::hash_password,
    entities::user::User,
    render::form::RawForm,
    settings::{AppConfig, AppEnvironment},
};

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "ResumeCraft-Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        database_url: "postgres://localhost/resumecraft_test".to_string(),
        redis_url: None,
        cors_allowed_origins: vec!["*".to_string()],
        jwt_secret: "test_jwt_secret_that_is_long_enough_0123456789".to_string(),
        jwt_expiration_minutes: 15,
        refresh_token_secret: "test_refresh_secret_that_is_long_enough_98765".to_string(),
        refresh_token_exp_days: 7,
        verification_token_exp_minutes: 60,
        template_dir: "templates/variants".to_string(),
        upload_dir: "data/uploads".to_string(),
        resume_dir: "data/resumes".to_string(),
        max_upload_bytes: 10 * 1024 * 1024,
        mail_server: None,
        mail_port: 587,
        mail_username: None,
        mail_password: None,
        mail_from: None,
        base_url: "http://127.0.0.1:8080".to_string(),
    }
}

pub struct TestUser;

impl TestUser {
    /// A verified user whose password is `password`.
    pub fn with_password(email: &str, password: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: None,
            password_hash: hash_password(password).unwrap(),
            is_admin: false,
            is_verified: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        }
    }

    pub fn unverified(email: &str) -> User {
        let mut user = Self::with_password(email, "Tr4ck#Glacier!92");
        user.is_verified = false;
        user
    }
}

/// Builds a raw submission from string pairs, the way a JSON client posts it.
pub fn form(fields: &[(&str, &str)]) -> RawForm {
    RawForm::from_pairs(
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    )
}

/// A complete submission with one experience and one education entry.
pub fn full_form(template: &str) -> RawForm {
    form(&[
        ("full_name", "Jane Doe"),
        ("title", "Backend Engineer"),
        ("email", "jane@x.com"),
        ("phone", "555-0100"),
        ("summary", "Builds resilient backends."),
        ("skills", "Go, Python, Rust"),
        ("linkedin", "https://linkedin.com/in/jane"),
        ("exp_role_1", "Engineer"),
        ("exp_company_1", "Acme"),
        ("exp_dates_1", "2019-2023"),
        ("exp_desc_1", "Shipped things."),
        ("edu_school_1", "MIT"),
        ("edu_degree_1", "BSc"),
        ("edu_years_1", "2015-2019"),
        ("template", template),
    ])
}
