use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::{AppliedCoupon, Cart, CartItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub item: CartItem,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Everything the cart and checkout pages display.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub id: Uuid,
    pub items: Vec<CartLine>,
    pub coupon: Option<AppliedCoupon>,
    pub item_count: i64,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}

impl CartView {
    pub fn new(id: Uuid, cart: &Cart) -> Self {
        let totals = cart.totals();
        let items = cart
            .items
            .iter()
            .map(|item| CartLine {
                item: item.clone(),
                unit_price: item.unit_price(),
                line_total: item.line_total(),
            })
            .collect();
        Self {
            id,
            items,
            coupon: cart.coupon.clone(),
            item_count: totals.item_count,
            subtotal: totals.subtotal,
            discount: totals.discount,
            total: totals.total,
        }
    }
}
