use axum::{extract::FromRequestParts, http::header};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    entity::Admins,
    error::AppError,
    services::auth_service::verify_token,
    state::AppState,
};

/// A signed-in admin, resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub admin_id: Uuid,
    pub email: String,
}

pub fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;
        let token = bearer_token(auth_str).ok_or(AppError::Unauthorized)?;

        let admin_id = verify_token(&state.auth.jwt_secret, token)?;

        // Tokens outlive deleted accounts; re-check on every request.
        let admin = Admins::find_by_id(admin_id)
            .one(&state.orm)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AdminUser {
            admin_id: admin.id,
            email: admin.email,
        })
    }
}
