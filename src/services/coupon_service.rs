use chrono::Utc;
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, EntityTrait, QueryOrder, Set, sea_query::OnConflict};

use crate::{
    audit,
    dto::coupons::{CouponList, UpsertCouponRequest},
    entity::coupons::{ActiveModel, Column, Entity as Coupons, Model as CouponModel},
    error::{AppError, AppResult},
    middleware::auth::AdminUser,
    models::Coupon,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Coupon codes are matched trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub async fn find_coupon<C: ConnectionTrait>(conn: &C, code: &str) -> AppResult<Option<Coupon>> {
    let coupon = Coupons::find_by_id(code.to_string())
        .one(conn)
        .await?
        .map(coupon_from_entity);
    Ok(coupon)
}

pub async fn list_coupons(
    state: &AppState,
    _admin: &AdminUser,
) -> AppResult<ApiResponse<CouponList>> {
    let items: Vec<Coupon> = Coupons::find()
        .order_by_asc(Column::Code)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(coupon_from_entity)
        .collect();

    let meta = Meta::unpaged(items.len());
    Ok(ApiResponse::success(
        "Coupons",
        CouponList { items },
        Some(meta),
    ))
}

/// Creates the coupon, or overwrites the discount of an existing code.
pub async fn upsert_coupon(
    state: &AppState,
    admin: &AdminUser,
    payload: UpsertCouponRequest,
) -> AppResult<ApiResponse<Coupon>> {
    let code = normalize_code(&payload.code);
    let discount = payload.discount;
    if code.is_empty() || !discount.is_finite() || discount <= 0.0 || discount > 100.0 {
        return Err(AppError::BadRequest(
            "Please fill both coupon fields correctly.".into(),
        ));
    }

    let active = ActiveModel {
        code: Set(code),
        discount: Set(discount),
        created_at: NotSet,
    };
    let coupon = Coupons::insert(active)
        .on_conflict(
            OnConflict::column(Column::Code)
                .update_column(Column::Discount)
                .to_owned(),
        )
        .exec_with_returning(&state.orm)
        .await?;

    audit::record(
        &state.pool,
        Some(admin.admin_id),
        "coupon_upsert",
        "coupons",
        serde_json::json!({ "code": coupon.code, "discount": coupon.discount }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Coupon '{}' saved successfully.", coupon.code),
        coupon_from_entity(coupon),
        Some(Meta::empty()),
    ))
}

pub async fn delete_coupon(
    state: &AppState,
    admin: &AdminUser,
    code: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let code = normalize_code(code);
    let result = Coupons::delete_by_id(code.clone()).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(admin.admin_id),
        "coupon_delete",
        "coupons",
        serde_json::json!({ "code": code }),
    )
    .await;

    Ok(ApiResponse::success(
        "Coupon deleted successfully.",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn coupon_from_entity(model: CouponModel) -> Coupon {
    Coupon {
        code: model.code,
        discount: model.discount,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
