use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};

use crate::{
    dto::orders::OrderList,
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::AppResult,
    middleware::auth::AdminUser,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::order_service::order_from_entity,
    state::AppState,
};

/// Historical orders, newest first.
pub async fn list_orders(
    state: &AppState,
    _admin: &AdminUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Orders::find().order_by_desc(OrderCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<Order>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(meta),
    ))
}
