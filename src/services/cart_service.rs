use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    cart::{AppliedCoupon, Cart, CartItem},
    dto::cart::{AddCartItemRequest, ApplyCouponRequest, CartView, UpdateCartItemRequest},
    entity::carts::{ActiveModel as CartActive, Entity as Carts, Model as CartModel},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::{coupon_service, product_service},
    state::AppState,
};

pub async fn create_cart(state: &AppState) -> AppResult<ApiResponse<CartView>> {
    let id = Uuid::new_v4();
    let cart = Cart::default();
    CartActive {
        id: Set(id),
        items: Set(serde_json::to_value(&cart.items)?),
        coupon_code: Set(None),
        coupon_discount: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::debug!(cart_id = %id, "cart created");
    Ok(ApiResponse::success(
        "Cart created",
        CartView::new(id, &cart),
        Some(Meta::empty()),
    ))
}

pub async fn get_cart(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CartView>> {
    let model = Carts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let cart = cart_from_entity(&model)?;
    Ok(ApiResponse::success("Cart", CartView::new(id, &cart), None))
}

pub async fn add_item(
    state: &AppState,
    id: Uuid,
    payload: AddCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let product = product_service::find_product(&state.orm, payload.product_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("product not found".into()))?;

    let cart = mutate_cart(state, id, |cart| cart.add_product(&product)).await?;

    Ok(ApiResponse::success(
        format!("{} added to cart!", product.name),
        CartView::new(id, &cart),
        None,
    ))
}

pub async fn update_item(
    state: &AppState,
    id: Uuid,
    product_id: Uuid,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<CartView>> {
    let cart = mutate_cart(state, id, |cart| {
        if cart.set_quantity(product_id, payload.quantity) {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    })
    .await?;

    Ok(ApiResponse::success("Cart updated", CartView::new(id, &cart), None))
}

pub async fn remove_item(
    state: &AppState,
    id: Uuid,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let cart = mutate_cart(state, id, |cart| {
        if cart.remove(product_id) {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    })
    .await?;

    Ok(ApiResponse::success(
        "Removed from cart",
        CartView::new(id, &cart),
        None,
    ))
}

/// Applies a coupon by code. An unknown code clears any coupon already on
/// the cart before the error is returned.
pub async fn apply_coupon(
    state: &AppState,
    id: Uuid,
    payload: ApplyCouponRequest,
) -> AppResult<ApiResponse<CartView>> {
    let code = coupon_service::normalize_code(&payload.code);
    if code.is_empty() {
        return Err(AppError::BadRequest("Coupon code is required".into()));
    }

    let applied = coupon_service::find_coupon(&state.orm, &code)
        .await?
        .map(|coupon| AppliedCoupon {
            code: coupon.code,
            discount: coupon.discount,
        });
    let valid = applied.is_some();

    let cart = mutate_cart(state, id, |cart| {
        cart.apply_coupon(applied);
        Ok(())
    })
    .await?;

    if !valid {
        return Err(AppError::BadRequest("Invalid coupon code.".into()));
    }

    Ok(ApiResponse::success(
        format!("Coupon '{code}' applied!"),
        CartView::new(id, &cart),
        None,
    ))
}

pub async fn remove_coupon(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CartView>> {
    let cart = mutate_cart(state, id, |cart| {
        cart.apply_coupon(None);
        Ok(())
    })
    .await?;

    Ok(ApiResponse::success(
        "Coupon removed",
        CartView::new(id, &cart),
        None,
    ))
}

/// Loads the cart under a row lock, applies `change`, writes it back and
/// commits. Nothing is written when `change` fails.
async fn mutate_cart<F>(state: &AppState, id: Uuid, change: F) -> AppResult<Cart>
where
    F: FnOnce(&mut Cart) -> AppResult<()>,
{
    let txn = state.orm.begin().await?;
    let (model, mut cart) = lock_cart(&txn, id).await?;
    change(&mut cart)?;
    save_cart(&txn, model, &cart).await?;
    txn.commit().await?;
    Ok(cart)
}

pub(crate) async fn lock_cart(txn: &DatabaseTransaction, id: Uuid) -> AppResult<(CartModel, Cart)> {
    let model = Carts::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let cart = cart_from_entity(&model)?;
    Ok((model, cart))
}

pub(crate) async fn save_cart<C: ConnectionTrait>(
    conn: &C,
    model: CartModel,
    cart: &Cart,
) -> AppResult<()> {
    let mut active: CartActive = model.into();
    active.items = Set(serde_json::to_value(&cart.items)?);
    active.coupon_code = Set(cart.coupon.as_ref().map(|c| c.code.clone()));
    active.coupon_discount = Set(cart.coupon.as_ref().map(|c| c.discount));
    active.updated_at = Set(Utc::now().into());
    active.update(conn).await?;
    Ok(())
}

fn cart_from_entity(model: &CartModel) -> AppResult<Cart> {
    let items: Vec<CartItem> = serde_json::from_value(model.items.clone())?;
    let coupon = match (&model.coupon_code, model.coupon_discount) {
        (Some(code), Some(discount)) => Some(AppliedCoupon {
            code: code.clone(),
            discount,
        }),
        _ => None,
    };
    Ok(Cart::new(items, coupon))
}
