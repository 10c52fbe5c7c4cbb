use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit,
    cart::CartItem,
    dto::orders::{CheckoutRequest, OrderConfirmation},
    entity::orders::{ActiveModel as OrderActive, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    models::Order,
    response::{ApiResponse, Meta},
    services::cart_service::{lock_cart, save_cart},
    state::AppState,
};

/// Turns the cart into an order. The order insert and the cart reset share
/// one transaction, so the cart is only emptied once the order exists.
pub async fn place_order(
    state: &AppState,
    cart_id: Uuid,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderConfirmation>> {
    let customer = validate_customer(payload)?;

    let txn = state.orm.begin().await?;
    let (cart_model, mut cart) = lock_cart(&txn, cart_id).await?;

    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let totals = cart.totals();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_name: Set(customer.name),
        phone: Set(customer.phone),
        address: Set(customer.address),
        pincode: Set(customer.pincode),
        items: Set(serde_json::to_value(&cart.items)?),
        coupon_applied: Set(cart.coupon.as_ref().map(|c| c.code.clone())),
        total_price: Set(totals.total),
        created_at: NotSet,
    }
    .insert(&txn)
    .await
    .map_err(AppError::OrderPlacement)?;

    cart.clear();
    save_cart(&txn, cart_model, &cart)
        .await
        .map_err(into_placement_error)?;
    txn.commit().await.map_err(AppError::OrderPlacement)?;

    let order = order_from_entity(order)?;
    tracing::info!(
        order_id = %order.id,
        cart_id = %cart_id,
        total = order.total_price,
        "order placed"
    );

    audit::record(
        &state.pool,
        None,
        "order_place",
        "orders",
        serde_json::json!({
            "order_id": order.id,
            "total_price": order.total_price,
            "coupon": order.coupon_applied,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order placed",
        OrderConfirmation::from(&order),
        Some(Meta::empty()),
    ))
}

pub async fn get_order_confirmation(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<OrderConfirmation>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let order = order_from_entity(order)?;
    Ok(ApiResponse::success(
        "Order",
        OrderConfirmation::from(&order),
        Some(Meta::empty()),
    ))
}

struct Customer {
    name: String,
    phone: String,
    address: String,
    pincode: String,
}

fn validate_customer(payload: CheckoutRequest) -> AppResult<Customer> {
    let required = |value: String, field: &str| -> AppResult<String> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
        Ok(value)
    };

    Ok(Customer {
        name: required(payload.name, "name")?,
        phone: required(payload.phone, "phone")?,
        address: required(payload.address, "address")?,
        pincode: required(payload.pincode, "pincode")?,
    })
}

fn into_placement_error(err: AppError) -> AppError {
    match err {
        AppError::OrmError(db_err) => AppError::OrderPlacement(db_err),
        other => other,
    }
}

pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let items: Vec<CartItem> = serde_json::from_value(model.items)?;
    Ok(Order {
        id: model.id,
        customer_name: model.customer_name,
        phone: model.phone,
        address: model.address,
        pincode: model.pincode,
        items,
        coupon_applied: model.coupon_applied,
        total_price: model.total_price,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
