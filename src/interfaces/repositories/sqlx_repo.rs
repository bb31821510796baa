use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxResumeRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxUploadRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxRatingRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSettingsRepo {
    pub pool: PgPool,
}
