use crate::db::{DbPool, OrmConn, create_orm_conn};

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(pool: DbPool, auth: AuthSettings) -> Self {
        let orm = create_orm_conn(&pool);
        Self { pool, orm, auth }
    }
}
